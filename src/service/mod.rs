pub mod debounce;
pub mod gateway_client;
pub mod registrar;
pub mod registration_session;
pub mod signing;

pub use debounce::Debouncer;
pub use gateway_client::{GatewayClient, HttpGateway};
pub use registrar::Registrar;
pub use registration_session::{FormControls, RegistrationSession, SignatureRequest, SubmitCommand};
pub use signing::{LocalWalletSigner, MessageSigner, SignedMessage};
