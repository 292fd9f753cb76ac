pub mod mediator;
pub mod outfit;
pub mod responder;
pub mod wardrobe;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export the mediator to make it easily accessible to the binary that
// wires the transport dispatcher.
pub use mediator::Mediator;
pub use outfit::OutfitSelector;
pub use responder::ChatResponder;
pub use wardrobe::WardrobeIngestor;
