pub mod category;
pub mod classification;
pub mod feedback;
pub mod prediction;
pub mod taxonomy;
pub mod transaction;
pub mod user;

pub use category::{Category, CategoryChanges, CategoryFilter, NewCategory};
pub use classification::{Explanation, PredictRequest, PredictionOutcome};
pub use feedback::{Feedback, FeedbackChanges, FeedbackFilter, NewFeedback};
pub use prediction::{NewPrediction, Prediction, PredictionChanges, PredictionFilter};
pub use taxonomy::{Taxonomy, TaxonomyRequest};
pub use transaction::{NewTransaction, Transaction, TransactionChanges, TransactionFilter};
pub use user::{NewUser, User, UserChanges, UserFilter};
