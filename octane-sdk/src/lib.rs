//! Async client for the Octane REST API.
//!
//! ```no_run
//! use octane_sdk::{Octane, Query, UserAuthentication};
//!
//! # async fn run() -> octane_sdk::SdkResult<()> {
//! let octane = Octane::builder(UserAuthentication::new("sa@nga", "Welcome1"))
//!     .server("https://octane.example.com")
//!     .shared_space(1001)
//!     .workspace(1002)
//!     .build()
//!     .await?;
//!
//! let defects = octane
//!     .entity_list("defects")
//!     .get()
//!     .add_fields(["name", "severity"])
//!     .limit(10)
//!     .query(Query::equal_to("phase", "new"))
//!     .execute()
//!     .await?;
//! println!("{} of {}", defects.entities.len(), defects.total_count);
//! # Ok(())
//! # }
//! ```

mod attachments;
mod client;
mod config;
mod entity_list;
mod error;
mod metadata;

pub use attachments::Attachments;
pub use client::{Octane, OctaneBuilder};
pub use config::OctaneConfig;
pub use entity_list::{
    CreateEntities, DeleteEntities, EntityList, EntityService, GetEntities, GetEntity, UpdateEntities,
};
pub use error::{SdkError, SdkResult};
pub use metadata::Metadata;

pub use octane_model::{
    EntityCollection, EntityMetadata, EntityModel, ErrorModel, FieldKind, FieldMetadata, FieldModel,
    FieldValue, ModelError, ModelParser, MultiReference,
};
pub use octane_query::{Comparison, Literal, OrderBy, Query};
pub use octane_transport::{
    Authentication, ClientAuthentication, TransportConfig, TransportError, UserAuthentication,
};
