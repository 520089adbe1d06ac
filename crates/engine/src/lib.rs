pub mod anchor;
pub mod lifecycle;
pub mod rates;
pub mod session;
pub mod ticker;
pub mod window;

pub use anchor::AnchorResolver;
pub use lifecycle::{Engine, EngineHandle};
pub use rates::{HttpRateSource, RatesCache};
pub use session::{Session, TickOutcome};
pub use ticker::TickGenerator;
pub use window::RollingWindow;
