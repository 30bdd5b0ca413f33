pub mod helpers;
pub mod mock_handler;
pub mod mock_verifier;
pub mod value_store;

pub use helpers::*;
pub use mock_handler::{HandledResponse, MockResponseHandler};
pub use mock_verifier::MockVerifier;
pub use value_store::ValueStore;
