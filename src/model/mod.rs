pub mod effect;
pub mod form_id;
pub mod magnitude;
pub mod record;

pub use effect::EffectOccurrence;
pub use form_id::FormId;
pub use magnitude::Magnitude;
pub use record::{IngredientFlags, IngredientRecord};
