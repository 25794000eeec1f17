//! Request encoding: raw string fields → fixed-order feature vector.
//!
//! - `codec`: closed vocabularies and their integer codes
//! - `schema`: field order and kinds
//! - `builder`: validation + assembly of one `FeatureVector`

pub mod builder;
pub mod codec;
pub mod schema;

pub use builder::*;
pub use codec::*;
pub use schema::*;
