pub mod wallet;
pub mod raffle;
pub mod rpc;
pub mod session;

pub use wallet::WalletKind;
pub use raffle::{Raffle, RaffleFeed, RaffleSource};
pub use session::Session;
