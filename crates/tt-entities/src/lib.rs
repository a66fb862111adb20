//! Entity values, the entity bag, and the two entity retrievers used by the
//! ThingTalk NN serializer (spec §4.2, §4.3).

pub mod bag;
pub mod error;
pub mod iso8601;
pub mod registry;
pub mod retriever;
pub mod value;

pub use bag::{EntityBag, RetrievalBags};
pub use error::EntityError;
pub use retriever::{EntityRetriever, FindEntityOpts, InlineTerm, RetrievedForm};
pub use value::EntityValue;
