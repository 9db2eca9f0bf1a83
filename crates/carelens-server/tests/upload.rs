use carelens_server::upload::ScopedUpload;

#[tokio::test]
async fn write_stages_bytes_with_suffix() {
    let dir = tempfile::tempdir().unwrap();
    let upload = ScopedUpload::write(dir.path(), ".wav", b"RIFF data").await.unwrap();

    let path = upload.path().to_path_buf();
    assert!(path.starts_with(dir.path()));
    assert!(path.to_string_lossy().ends_with(".wav"));
    assert_eq!(std::fs::read(&path).unwrap(), b"RIFF data");

    upload.release();
    assert!(!path.exists());
}

#[tokio::test]
async fn dropping_an_upload_deletes_it() {
    let dir = tempfile::tempdir().unwrap();
    let upload = ScopedUpload::write(dir.path(), ".png", b"png").await.unwrap();
    let path = upload.path().to_path_buf();

    drop(upload);
    assert!(!path.exists());
}

#[tokio::test]
async fn release_tolerates_an_already_deleted_file() {
    let dir = tempfile::tempdir().unwrap();
    let upload = ScopedUpload::write(dir.path(), ".png", b"png").await.unwrap();
    std::fs::remove_file(upload.path()).unwrap();

    // Logged, not propagated.
    upload.release();
}

#[tokio::test]
async fn missing_directory_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = ScopedUpload::write(&dir.path().join("absent"), ".png", b"png").await;
    assert!(result.is_err());
}
