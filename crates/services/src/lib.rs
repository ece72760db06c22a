//! Application services for StackIt.
//!
//! Each service orchestrates one slice of the domain over the port traits:
//! guard, mutate through the port, emit notifications, respond. Transport
//! concerns (status codes, envelopes) stay in the API adapters; storage
//! concerns (transactions, SQL) stay in the storage adapters.

pub mod accounts;
pub mod acceptance;
pub mod moderation;
pub mod notifications;
pub mod questions;
pub mod sanitize;
pub mod tags;
pub mod votes;

pub use accounts::{AccountService, AuthSession};
pub use acceptance::{AcceptReceipt, AcceptanceService};
pub use moderation::ModerationService;
pub use notifications::{FeedPage, NotificationService, NotificationView};
pub use questions::{
    AnswerView, AuthorBrief, NewQuestion, QuestionDetail, QuestionListing, QuestionService,
};
pub use tags::TagService;
pub use votes::{VoteReceipt, VoteService};
