pub mod artworks;
pub mod decade;
pub mod gallery;
pub mod history;
pub mod session;
pub mod song;

pub use artworks::*;
pub use decade::*;
pub use gallery::*;
pub use history::*;
pub use session::*;
pub use song::*;
