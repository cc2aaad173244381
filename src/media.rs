use std::path::Path;

use anyhow::Context;
use uuid::Uuid;

use crate::error::AppResult;

/// Write an uploaded image under the media root and return its relative
/// path, `{movie_id}/{uuid4}`. The random name makes repeated uploads for
/// the same movie collision-proof; external serving must preserve it.
pub async fn store_movie_image(
    media_root: &Path,
    movie_id: i32,
    bytes: &[u8],
) -> AppResult<String> {
    let relative = format!("{}/{}", movie_id, Uuid::new_v4());
    let path = media_root.join(&relative);
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("create media dir {}", parent.display()))?;
    }
    tokio::fs::write(&path, bytes)
        .await
        .with_context(|| format!("write media file {}", path.display()))?;
    Ok(relative)
}

pub fn media_url(relative: &str) -> String {
    format!("/media/{relative}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stored_paths_are_distinct_and_movie_scoped() {
        let dir = tempfile::tempdir().unwrap();

        let first = store_movie_image(dir.path(), 42, b"fake image bytes").await.unwrap();
        let second = store_movie_image(dir.path(), 42, b"fake image bytes").await.unwrap();

        assert!(first.starts_with("42/"));
        assert!(second.starts_with("42/"));
        assert_ne!(first, second);

        let on_disk = tokio::fs::read(dir.path().join(&first)).await.unwrap();
        assert_eq!(on_disk, b"fake image bytes");
    }

    #[tokio::test]
    async fn uuid_part_parses_as_uuid() {
        let dir = tempfile::tempdir().unwrap();
        let relative = store_movie_image(dir.path(), 7, b"x").await.unwrap();
        let (movie_part, uuid_part) = relative.split_once('/').unwrap();
        assert_eq!(movie_part, "7");
        assert!(Uuid::parse_str(uuid_part).is_ok());
    }
}
