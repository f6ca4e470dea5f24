//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod checkin_repo;
pub mod domain_repo;
pub mod email_template_repo;
pub mod event_repo;
pub mod order_repo;
pub mod page_repo;
pub mod participant_repo;
pub mod promo_code_repo;
pub mod sender_repo;
pub mod session_participant_repo;
pub mod session_repo;
pub mod site_repo;
pub mod ticket_type_repo;
pub mod user_repo;

pub use checkin_repo::CheckinRepo;
pub use domain_repo::DomainRepo;
pub use email_template_repo::EmailTemplateRepo;
pub use event_repo::EventRepo;
pub use order_repo::OrderRepo;
pub use page_repo::PageRepo;
pub use participant_repo::ParticipantRepo;
pub use promo_code_repo::PromoCodeRepo;
pub use sender_repo::SenderRepo;
pub use session_participant_repo::SessionParticipantRepo;
pub use session_repo::SessionRepo;
pub use site_repo::SiteRepo;
pub use ticket_type_repo::TicketTypeRepo;
pub use user_repo::UserRepo;
