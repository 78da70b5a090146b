//! Auction core: pure state machines for the live-auction page,
//! the SSO login handshake and the paginated search cursor.
mod cursor;
mod effect;
mod login;
mod msg;
mod phase;
mod state;
mod update;
mod view_model;

pub use cursor::{Advance, CachedPage, SearchCursor};
pub use effect::{Effect, Notice, Severity};
pub use login::{
    callback_params, callback_result_message, link_failure_message, LoginAction, LoginListener,
    LoginMessage, LoginStatus, MessageEnvelope, AUTH_WINDOW_NAME,
};
pub use msg::{BidOutcome, Msg};
pub use phase::{phase_at, time_left, AuctionPhase, TimeLeft, PRE_CONNECT_WINDOW_MS};
pub use state::{BidEvent, ItemSnapshot, LivePageState};
pub use update::update;
pub use view_model::LivePageView;
