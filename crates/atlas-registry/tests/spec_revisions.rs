//! Spec revisioning and contents-read tests.

use std::sync::Arc;

use atlas_core::error::Error;
use atlas_core::storage::MemoryStore;
use atlas_registry::prelude::*;

fn engine() -> (RegistryReader, RegistryWriter) {
    let store = Arc::new(MemoryStore::new());
    (
        RegistryReader::new(store.clone()),
        RegistryWriter::new(store),
    )
}

const SPEC_NAME: &str = "projects/my-project/locations/global/apis/my-api/versions/v1/specs/openapi";

async fn seed_spec(writer: &RegistryWriter, contents: &[u8]) -> ApiSpec {
    writer
        .create(CreateRequest::<Project> {
            parent: String::new(),
            id: "my-project".into(),
            resource: Some(Project::default()),
        })
        .await
        .unwrap();
    writer
        .create(CreateRequest {
            parent: "projects/my-project/locations/global".into(),
            id: "my-api".into(),
            resource: Some(Api::default()),
        })
        .await
        .unwrap();
    writer
        .create(CreateRequest {
            parent: "projects/my-project/locations/global/apis/my-api".into(),
            id: "v1".into(),
            resource: Some(ApiVersion::default()),
        })
        .await
        .unwrap();
    writer
        .create(CreateRequest {
            parent: "projects/my-project/locations/global/apis/my-api/versions/v1".into(),
            id: "openapi".into(),
            resource: Some(ApiSpec {
                filename: "openapi.yaml".into(),
                mime_type: "application/x.openapi;version=3".into(),
                contents: contents.to_vec(),
                ..ApiSpec::default()
            }),
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn create_computes_digest_size_and_revision() {
    let (_, writer) = engine();
    let spec = seed_spec(&writer, b"openapi: 3.0.0").await;

    assert_eq!(spec.size_bytes, 14);
    assert_eq!(spec.hash.len(), 64);
    assert_eq!(spec.revision_id.len(), 8);
    assert_eq!(spec.revision_create_time, spec.create_time);
    assert_eq!(spec.revision_update_time, spec.update_time);
}

#[tokio::test]
async fn metadata_update_preserves_revision() {
    let (reader, writer) = engine();
    let spec = seed_spec(&writer, b"openapi: 3.0.0").await;

    let updated = writer
        .update(UpdateRequest {
            resource: Some(ApiSpec {
                name: SPEC_NAME.into(),
                description: "primary spec".into(),
                ..ApiSpec::default()
            }),
            update_mask: Some(FieldMask::new(["description"])),
            allow_missing: false,
        })
        .await
        .unwrap();

    assert_eq!(updated.revision_id, spec.revision_id);
    assert_eq!(updated.revision_create_time, spec.revision_create_time);
    assert_eq!(updated.description, "primary spec");

    let fetched: ApiSpec = reader.get(SPEC_NAME).await.unwrap();
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn contents_update_mints_new_revision_and_archives_old() {
    let (reader, writer) = engine();
    let original = seed_spec(&writer, b"openapi: 3.0.0").await;

    let updated = writer
        .update(UpdateRequest {
            resource: Some(ApiSpec {
                name: SPEC_NAME.into(),
                contents: b"openapi: 3.1.0".to_vec(),
                ..ApiSpec::default()
            }),
            update_mask: Some(FieldMask::new(["contents"])),
            allow_missing: false,
        })
        .await
        .unwrap();

    assert_ne!(updated.revision_id, original.revision_id);
    assert_eq!(updated.create_time, original.create_time);

    // Current revision, by plain name and by explicit revision id.
    let (_, current) = reader.spec_contents(SPEC_NAME).await.unwrap();
    assert_eq!(current, b"openapi: 3.1.0");
    let (_, by_id) = reader
        .spec_contents(&format!("{SPEC_NAME}@{}", updated.revision_id))
        .await
        .unwrap();
    assert_eq!(by_id, b"openapi: 3.1.0");

    // The superseded revision stays addressable.
    let (mime, archived) = reader
        .spec_contents(&format!("{SPEC_NAME}@{}", original.revision_id))
        .await
        .unwrap();
    assert_eq!(archived, b"openapi: 3.0.0");
    assert_eq!(mime, "application/x.openapi;version=3");
}

#[tokio::test]
async fn unknown_revision_is_not_found() {
    let (reader, writer) = engine();
    seed_spec(&writer, b"openapi: 3.0.0").await;

    let err = reader
        .spec_contents(&format!("{SPEC_NAME}@ffffffff"))
        .await
        .expect_err("unknown revision should fail");
    assert!(matches!(err, Error::NotFound { .. }));

    let err = reader
        .spec_contents(
            "projects/my-project/locations/global/apis/my-api/versions/v1/specs/missing",
        )
        .await
        .expect_err("absent spec should fail");
    assert!(matches!(err, Error::NotFound { .. }));
}

#[tokio::test]
async fn malformed_revision_suffix_is_invalid() {
    let (reader, _) = engine();
    let err = reader
        .spec_contents(&format!("{SPEC_NAME}@"))
        .await
        .expect_err("empty revision id should fail");
    assert!(matches!(err, Error::InvalidArgument { .. }));
}

#[tokio::test]
async fn delete_spec_removes_archived_revisions() {
    let (reader, writer) = engine();
    let original = seed_spec(&writer, b"v1").await;
    writer
        .update(UpdateRequest {
            resource: Some(ApiSpec {
                name: SPEC_NAME.into(),
                contents: b"v2".to_vec(),
                ..ApiSpec::default()
            }),
            update_mask: Some(FieldMask::new(["contents"])),
            allow_missing: false,
        })
        .await
        .unwrap();

    writer.delete::<ApiSpec>(SPEC_NAME).await.unwrap();

    // Recreate the spec under the same name; the old archive must be gone.
    writer
        .create(CreateRequest {
            parent: "projects/my-project/locations/global/apis/my-api/versions/v1".into(),
            id: "openapi".into(),
            resource: Some(ApiSpec {
                contents: b"v3".to_vec(),
                ..ApiSpec::default()
            }),
        })
        .await
        .unwrap();

    let err = reader
        .spec_contents(&format!("{SPEC_NAME}@{}", original.revision_id))
        .await
        .expect_err("archive should have been cascaded away");
    assert!(matches!(err, Error::NotFound { .. }));
}

#[tokio::test]
async fn upsert_spec_without_ancestors() {
    let (reader, writer) = engine();

    let created = writer
        .update(UpdateRequest {
            resource: Some(ApiSpec {
                name: SPEC_NAME.into(),
                contents: b"orphan".to_vec(),
                ..ApiSpec::default()
            }),
            update_mask: None,
            allow_missing: true,
        })
        .await
        .unwrap();
    assert_eq!(created.name, SPEC_NAME);
    assert!(!created.revision_id.is_empty());

    let err = reader
        .get::<ApiVersion>("projects/my-project/locations/global/apis/my-api/versions/v1")
        .await
        .expect_err("ancestors are never auto-created");
    assert!(matches!(err, Error::NotFound { .. }));
}

#[tokio::test]
async fn artifact_contents_roundtrip() {
    let (reader, writer) = engine();
    writer
        .create(CreateRequest::<Project> {
            parent: String::new(),
            id: "my-project".into(),
            resource: Some(Project::default()),
        })
        .await
        .unwrap();
    let artifact = writer
        .create(CreateRequest {
            parent: "projects/my-project".into(),
            id: "scorecard".into(),
            resource: Some(Artifact {
                mime_type: "application/json".into(),
                contents: b"{\"score\":10}".to_vec(),
                ..Artifact::default()
            }),
        })
        .await
        .unwrap();

    assert_eq!(artifact.size_bytes, 12);
    let (mime, contents) = reader
        .artifact_contents("projects/my-project/artifacts/scorecard")
        .await
        .unwrap();
    assert_eq!(mime, "application/json");
    assert_eq!(contents, b"{\"score\":10}");
}
