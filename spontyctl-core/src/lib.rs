pub mod config;
pub mod error;
pub mod join;
pub mod models;
pub mod views;

pub use config::BackendConfig;
pub use error::{Result, SpontyError};
pub use join::{bucket_by, index_by, join_unique};
pub use models::{
    Event, EventStatus, EventWithInvitations, FriendGroup, FriendProfile, FriendRequest,
    FriendRequestStatus, Friendship, GroupMember, Invitation, InvitationStatus, MemberProfile,
    Profile, RequestProfile,
};
pub use views::GuestLists;
