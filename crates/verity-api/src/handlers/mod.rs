pub mod detections;
pub mod relay;
pub mod upload;
