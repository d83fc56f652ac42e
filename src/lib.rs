pub mod error;

pub mod config {
    pub mod config;
    pub mod ports;
}

pub mod models {
    pub mod conversion;
    pub mod plan;
    pub mod task;
}

pub mod service {
    pub mod codec;
    pub mod config_service;
    pub mod converter;
    pub mod dispatcher;
    pub mod planner;
    pub mod reporter;
    pub mod scanner;
    pub mod traits {
        pub mod i_service;
    }
}

pub mod facade {
    pub mod conversion_facade;
    pub mod traits {
        pub mod i_conversion;
    }
}

pub mod action {
    pub mod cli;
    pub mod interactive;
}

pub mod utils {
    pub mod utils;
}
