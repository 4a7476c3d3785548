//! Query construction for Octane REST collections.
//!
//! - [`Query`]: a filter expression tree rendered in the service's textual
//!   filter grammar
//! - [`CollectionQuery`] / [`build_url`]: deterministic construction of a
//!   collection URL from projection, paging, ordering and filter
//!
//! Everything here is pure: no I/O, no shared state.
//!
//! # Example
//!
//! ```
//! use octane_query::{CollectionQuery, OrderBy};
//!
//! let url = CollectionQuery::new()
//!     .fields(["version_stamp", "item_type"])
//!     .limit(10)
//!     .offset(1)
//!     .order_by(OrderBy::descending("version_stamp"))
//!     .to_url("https://octane.example.com/api/shared_spaces/1001/workspaces/1002/defects");
//!
//! assert_eq!(
//!     url,
//!     "https://octane.example.com/api/shared_spaces/1001/workspaces/1002/defects\
//!      ?fields=version_stamp,item_type&limit=10&offset=1&order_by=-version_stamp"
//! );
//! ```

mod expression;
mod url;

pub use expression::{Comparison, Literal, Query};
pub use url::{CollectionQuery, OrderBy, build_url};
