mod artifact_library;
mod file_hasher;
mod path_validator;
mod upload_intake;

pub use artifact_library::{
    ArtifactEntry, LibraryError, list_artifacts, parse_segment_name, resolve_artifact,
};
pub use file_hasher::file_digest;
pub use path_validator::validate_file_exists;
pub use upload_intake::{
    IntakeError, MAX_UPLOAD_BYTES, StagedUpload, stage_upload, validate_clip_length,
};
