//! Backend operations, grouped by aggregate. Every method lives in an
//! `impl SpontyClient` block; this module tree only organizes them.

mod events;
mod friends;
mod groups;
mod invitations;
mod profiles;
mod requests;
