pub mod bugs;
pub mod modules;
pub mod users;

pub use bugs::BugsClient;
pub use modules::ModulesClient;
pub use users::UsersClient;
