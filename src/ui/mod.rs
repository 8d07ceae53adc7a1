// Output formatting module

pub mod i3bar;

pub use i3bar::LineRenderer;
