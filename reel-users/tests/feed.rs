mod common;

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use reel_blob::{MemoryObjectStore, ObjectStore};
use reel_core::{ErrorKind, ReelError};
use reel_users::{
    AssetFailurePolicy, FeedPage, ImageUpload, ProfilePatch, UserId, VideoId, VideoRecord,
};

use common::{config, harness, harness_with, Harness, ScriptedStore, THUMBNAIL_BUCKET};

fn seed_videos(h: &Harness, count: u64) {
    for n in 1..=count {
        h.records.insert_video(
            VideoRecord::new(VideoId::from_sequence(n), h.uuid.clone())
                .with_thumbnail_extension("jpg")
                .with_video_extension("mp4")
                .with_metadata("title", format!("video {n}")),
        );
    }
}

fn seed_thumbnails(objects: &MemoryObjectStore, count: u64) {
    for n in 1..=count {
        objects.insert(
            THUMBNAIL_BUCKET,
            &format!("{}.jpg", VideoId::from_sequence(n)),
            Bytes::from(format!("thumb {n}")),
        );
    }
}

fn thumbnail_key(n: u64) -> String {
    format!("{}.jpg", VideoId::from_sequence(n))
}

fn ids(page: &FeedPage) -> Vec<VideoId> {
    page.videos.iter().map(|video| video.id.clone()).collect()
}

fn sequence(range: impl Iterator<Item = u64>) -> Vec<VideoId> {
    range.map(VideoId::from_sequence).collect()
}

#[tokio::test]
async fn cursor_walks_pages_newest_first() {
    let h = harness();
    seed_videos(&h, 25);
    // another uploader's video in the middle of the id range
    h.records.insert_video(VideoRecord::new(
        VideoId::from_sequence(1_000),
        UserId::from_string("someone-else"),
    ));

    let first = h.service.get_uploaded_videos(&h.uuid, 10, None).await.unwrap();
    assert_eq!(ids(&first), sequence((16..=25).rev()));

    let second = h
        .service
        .get_uploaded_videos(&h.uuid, 10, first.next_cursor().cloned())
        .await
        .unwrap();
    assert_eq!(ids(&second), sequence((6..=15).rev()));

    let third = h
        .service
        .get_uploaded_videos(&h.uuid, 10, second.next_cursor().cloned())
        .await
        .unwrap();
    assert_eq!(ids(&third), sequence((1..=5).rev()));
    assert_eq!(third.next_cursor(), Some(&VideoId::from_sequence(1)));

    let exhausted = h
        .service
        .get_uploaded_videos(&h.uuid, 10, third.next_cursor().cloned())
        .await
        .unwrap();
    assert!(exhausted.is_empty());
    assert_eq!(exhausted.next_cursor(), None);
    assert_eq!(exhausted.uploader.nickname, "neo");
    assert_eq!(exhausted.uploader.uuid, h.uuid);
}

#[tokio::test]
async fn entries_expose_assets_not_internal_fields() {
    let h = harness();
    seed_videos(&h, 1);
    seed_thumbnails(&h.objects, 1);

    let page = h.service.get_uploaded_videos(&h.uuid, 10, None).await.unwrap();
    let json = serde_json::to_value(&page).unwrap();

    let video = &json["videos"][0];
    assert_eq!(video["_id"], VideoId::from_sequence(1).as_str());
    assert_eq!(video["title"], "video 1");
    assert_eq!(
        video["manifest"],
        format!("https://cdn/{}_,360p,720p/master.m3u8", VideoId::from_sequence(1))
    );
    assert_eq!(video["thumbnailImage"], "dGh1bWIgMQ==");
    for hidden in ["uploaderId", "thumbnailExtension", "videoExtension", "__v"] {
        assert!(video.get(hidden).is_none(), "{hidden} leaked into the entry");
    }

    let uploader = json["uploader"].as_object().unwrap();
    assert_eq!(uploader["uuid"], h.uuid.as_str());
    for hidden in ["_id", "__v", "profileImageExtension", "profileImage"] {
        assert!(!uploader.contains_key(hidden), "{hidden} leaked into the uploader");
    }
}

#[tokio::test]
async fn missing_thumbnail_is_null_and_uploader_image_is_included() {
    let h = harness();
    seed_videos(&h, 1);
    h.service
        .patch_profile(
            &h.uuid,
            ProfilePatch::new().upload_image(ImageUpload::new("me.png", &b"face"[..])),
        )
        .await
        .unwrap();

    let page = h.service.get_uploaded_videos(&h.uuid, 10, None).await.unwrap();
    assert_eq!(page.videos[0].thumbnail_image, None);
    assert_eq!(page.uploader.profile_image, Some(Bytes::from_static(b"face")));

    let json = serde_json::to_value(&page).unwrap();
    assert!(json["videos"][0]["thumbnailImage"].is_null());
    assert_eq!(json["uploader"]["profileImage"], "ZmFjZQ==");
}

#[tokio::test]
async fn order_survives_uneven_fetch_latency() {
    // the newest thumbnail is the slowest to arrive
    let mut scripted = ScriptedStore::new(MemoryObjectStore::new());
    for n in 1..=5u64 {
        scripted = scripted.delay_key(thumbnail_key(n), Duration::from_millis(40 * n));
    }
    let scripted = Arc::new(scripted);
    let handle = scripted.clone();
    let h = harness_with(config(), move |_| handle as Arc<dyn ObjectStore>);
    seed_videos(&h, 5);
    seed_thumbnails(&scripted.inner, 5);

    let page = h.service.get_uploaded_videos(&h.uuid, 10, None).await.unwrap();

    assert_eq!(ids(&page), sequence((1..=5).rev()));
    for (video, n) in page.videos.iter().zip((1..=5u64).rev()) {
        assert_eq!(video.thumbnail_image, Some(Bytes::from(format!("thumb {n}"))));
    }
    let completed = scripted.completed();
    assert_eq!(completed.first(), Some(&thumbnail_key(1)));
    assert_eq!(completed.last(), Some(&thumbnail_key(5)));
}

#[tokio::test]
async fn dropped_request_abandons_in_flight_fetches() {
    let mut scripted = ScriptedStore::new(MemoryObjectStore::new());
    for n in 1..=3u64 {
        scripted = scripted.delay_key(thumbnail_key(n), Duration::from_millis(200));
    }
    let scripted = Arc::new(scripted);
    let handle = scripted.clone();
    let h = harness_with(config(), move |_| handle as Arc<dyn ObjectStore>);
    seed_videos(&h, 3);
    seed_thumbnails(&scripted.inner, 3);

    let outcome = tokio::time::timeout(
        Duration::from_millis(50),
        h.service.get_uploaded_videos(&h.uuid, 10, None),
    )
    .await;
    assert!(outcome.is_err(), "page finished before the caller gave up");
    assert_eq!(scripted.gets(), 3);

    // well past every delay: none of the started fetches ran to completion
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(scripted.completed().is_empty());
}

#[tokio::test]
async fn asset_fetches_respect_concurrency_bound() {
    let scripted = Arc::new(ScriptedStore::new(MemoryObjectStore::new()));
    let handle = scripted.clone();
    let h = harness_with(config().with_asset_concurrency(2), move |_| {
        handle as Arc<dyn ObjectStore>
    });
    seed_videos(&h, 8);
    seed_thumbnails(&scripted.inner, 8);

    let page = h.service.get_uploaded_videos(&h.uuid, 8, None).await.unwrap();

    assert_eq!(page.videos.len(), 8);
    assert_eq!(scripted.gets(), 8);
    assert!(scripted.max_in_flight() <= 2);
}

#[tokio::test]
async fn asset_failure_fails_whole_page_by_default() {
    let h = harness_with(config(), |objects| {
        Arc::new(ScriptedStore::new(objects).fail_key(thumbnail_key(3))) as Arc<dyn ObjectStore>
    });
    seed_videos(&h, 5);
    seed_thumbnails(&h.objects, 5);

    let err = h
        .service
        .get_uploaded_videos(&h.uuid, 10, None)
        .await
        .unwrap_err();
    assert_eq!(ReelError::kind_of(&err), ErrorKind::Storage);
}

#[tokio::test]
async fn degrade_policy_serves_page_without_failed_asset() {
    let config = config().with_asset_failure(AssetFailurePolicy::DegradeToAbsent);
    let h = harness_with(config, |objects| {
        Arc::new(ScriptedStore::new(objects).fail_key(thumbnail_key(3))) as Arc<dyn ObjectStore>
    });
    seed_videos(&h, 5);
    seed_thumbnails(&h.objects, 5);

    let page = h.service.get_uploaded_videos(&h.uuid, 10, None).await.unwrap();

    assert_eq!(ids(&page), sequence((1..=5).rev()));
    for video in &page.videos {
        if video.id == VideoId::from_sequence(3) {
            assert_eq!(video.thumbnail_image, None);
        } else {
            assert!(video.thumbnail_image.is_some());
        }
    }
}

#[tokio::test]
async fn unknown_uploader_is_not_found() {
    let h = harness();

    let err = h
        .service
        .get_uploaded_videos(&UserId::from_string("ghost"), 10, None)
        .await
        .unwrap_err();
    assert_eq!(ReelError::kind_of(&err), ErrorKind::NotFound);
}

#[tokio::test]
async fn zero_limit_is_rejected() {
    let h = harness();

    let err = h
        .service
        .get_uploaded_videos(&h.uuid, 0, None)
        .await
        .unwrap_err();
    assert_eq!(ReelError::kind_of(&err), ErrorKind::BadRequest);
}

#[tokio::test]
async fn cursor_parsing_rejects_malformed_ids() {
    let err = VideoId::parse("not-an-object-id").unwrap_err();
    assert_eq!(ReelError::kind_of(&err), ErrorKind::BadRequest);

    let cursor = VideoId::parse("00000000000000000000000A").unwrap();
    assert_eq!(cursor, VideoId::from_sequence(10));
}
