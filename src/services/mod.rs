pub mod eve_scout;
