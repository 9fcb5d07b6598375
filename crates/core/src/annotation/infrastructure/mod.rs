pub mod in_memory_overlay;
