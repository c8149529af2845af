pub mod walutomat;

pub use walutomat::WalutomatProvider;
