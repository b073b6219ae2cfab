pub mod enhancement_replicate;
