pub mod ai_service;
pub mod exam_service;
pub mod image_service;
pub mod marking_service;
pub mod prompt_service;
pub mod reconcile_service;
