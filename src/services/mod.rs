pub mod demo_service;
pub mod samples;

pub use demo_service::{DemoService, NewBlogPost, NewSample, ServiceReply};
pub use samples::{SampleChanges, SampleStats, SampleStore};
