mod dependencies;

pub use dependencies::Dependencies;
