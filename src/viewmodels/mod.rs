pub mod wallet_viewmodel;
pub mod session_viewmodel;
pub mod raffle_viewmodel;
pub mod purchase_viewmodel;
pub mod app_viewmodel;

pub use wallet_viewmodel::{ConnectOutcome, WalletConnector};
pub use session_viewmodel::{SessionChange, SessionManager};
pub use raffle_viewmodel::RaffleReader;
pub use purchase_viewmodel::TicketPurchase;
pub use app_viewmodel::AppViewModel;
