/// Integration tests: storage, tools and server wiring together
mod workflow;
