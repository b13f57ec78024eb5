mod segment_collector;

pub use segment_collector::SegmentCollector;
