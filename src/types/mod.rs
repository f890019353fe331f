mod bin;
mod board;
mod ticket;
mod user;

pub use bin::Bin;
pub use board::Board;
pub use ticket::Ticket;
pub use user::User;

/// A remote collection entry addressable by ID or display name.
pub trait Named {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
}
