//! Integration tests for the file store and batch id lookup.

mod common;

use lantern_database::repositories::{CategoryRepository, FileRepository, FolderRepository};
use lantern_entity::file::CreateFile;

use common::test_pool;

#[tokio::test]
async fn find_in_folder_caps_results_but_not_the_total() {
    let pool = test_pool().await;
    let categories = CategoryRepository::new(pool.clone());
    let folders = FolderRepository::new(pool.clone());
    let files = FileRepository::new(pool);

    let category = categories.find_or_create("ProjectX").await.unwrap();
    let folder = folders
        .find_or_create(&category, None, "2020-01-01")
        .await
        .unwrap();
    for i in 0..5 {
        files
            .create(&CreateFile {
                category_id: category.id,
                folder_id: Some(folder.id),
                public_path: format!("2020-01-01/img-{i:03}.tif"),
                full_path: format!("VolumeA/ProjectX/2020-01-01/img-{i:03}.tif"),
                depth: 1,
            })
            .await
            .unwrap();
    }

    let (capped, total) = files
        .find_in_folder(&category, Some(&folder), 2)
        .await
        .unwrap();
    assert_eq!(capped.len(), 2);
    assert_eq!(total, 5);

    let (top_level, total) = files.find_in_folder(&category, None, 10).await.unwrap();
    assert!(top_level.is_empty());
    assert_eq!(total, 0);
}

#[tokio::test]
async fn file_search_total_is_independent_of_limit() {
    let pool = test_pool().await;
    let categories = CategoryRepository::new(pool.clone());
    let folders = FolderRepository::new(pool.clone());
    let files = FileRepository::new(pool);

    let category = categories.find_or_create("ProjectX").await.unwrap();
    let top = folders
        .find_or_create(&category, None, "2020-01-01")
        .await
        .unwrap();
    for i in 0..7 {
        files
            .create(&CreateFile {
                category_id: category.id,
                folder_id: Some(top.id),
                public_path: format!("2020-01-01/master-{i}.tif"),
                full_path: format!("VolumeA/ProjectX/2020-01-01/master-{i}.tif"),
                depth: 1,
            })
            .await
            .unwrap();
    }
    // A match outside the scoped subtree.
    files
        .create(&CreateFile {
            category_id: category.id,
            folder_id: None,
            public_path: "2021-05-05/master-x.tif".to_string(),
            full_path: "VolumeA/ProjectX/2021-05-05/master-x.tif".to_string(),
            depth: 1,
        })
        .await
        .unwrap();

    let (one, total_at_one) = files
        .search(&category, Some(&top), "master", 1)
        .await
        .unwrap();
    let (many, total_at_many) = files
        .search(&category, Some(&top), "master", 1000)
        .await
        .unwrap();

    assert_eq!(one.len(), 1);
    assert_eq!(many.len(), 7);
    assert_eq!(total_at_one, 7);
    assert_eq!(total_at_many, 7);

    let (_, unscoped_total) = files.search(&category, None, "master", 1000).await.unwrap();
    assert_eq!(unscoped_total, 8);
}

#[tokio::test]
async fn search_treats_like_wildcards_literally() {
    let pool = test_pool().await;
    let categories = CategoryRepository::new(pool.clone());
    let files = FileRepository::new(pool);

    let category = categories.find_or_create("ProjectX").await.unwrap();
    files
        .create(&CreateFile {
            category_id: category.id,
            folder_id: None,
            public_path: "2020-01-01/100%_scan.tif".to_string(),
            full_path: "ProjectX/2020-01-01/100%_scan.tif".to_string(),
            depth: 1,
        })
        .await
        .unwrap();
    files
        .create(&CreateFile {
            category_id: category.id,
            folder_id: None,
            public_path: "2020-01-01/plain.tif".to_string(),
            full_path: "ProjectX/2020-01-01/plain.tif".to_string(),
            depth: 1,
        })
        .await
        .unwrap();

    let (_, total) = files.search(&category, None, "%_", 10).await.unwrap();
    assert_eq!(total, 1);
}

#[tokio::test]
async fn batch_fetch_returns_each_id_once_in_deterministic_order() {
    let pool = test_pool().await;
    let categories = CategoryRepository::new(pool.clone());
    let files = FileRepository::new(pool);

    let category = categories.find_or_create("ProjectX").await.unwrap();

    // 2500 files forces three IN-query chunks. Interleave depths so the
    // final ordering cannot come from insert or fetch order.
    let mut ids = Vec::with_capacity(2500);
    for i in 0..2500 {
        let depth = (i % 3) as i64 + 1;
        let file = files
            .create(&CreateFile {
                category_id: category.id,
                folder_id: None,
                public_path: format!("2020-01-01/d{depth}/File-{:04}.tif", 2500 - i),
                full_path: format!("VolumeA/ProjectX/2020-01-01/d{depth}/File-{:04}.tif", 2500 - i),
                depth,
            })
            .await
            .unwrap();
        ids.push(file.id);
    }

    // A missing id is silently absent from the result.
    ids.push(9_999_999);
    ids.reverse();

    let fetched = files.find_by_ids(&ids).await.unwrap();
    assert_eq!(fetched.len(), 2500);

    let mut seen = std::collections::HashSet::new();
    assert!(fetched.iter().all(|f| seen.insert(f.id)));

    for pair in fetched.windows(2) {
        let earlier = (pair[0].depth, pair[0].public_path.to_lowercase());
        let later = (pair[1].depth, pair[1].public_path.to_lowercase());
        assert!(earlier <= later, "files out of order: {earlier:?} > {later:?}");
    }
}

#[tokio::test]
async fn batch_fetch_collapses_repeated_ids() {
    let pool = test_pool().await;
    let categories = CategoryRepository::new(pool.clone());
    let files = FileRepository::new(pool);

    let category = categories.find_or_create("ProjectX").await.unwrap();

    let mut ids = Vec::with_capacity(1001);
    for i in 0..1000 {
        let file = files
            .create(&CreateFile {
                category_id: category.id,
                folder_id: None,
                public_path: format!("2020-01-01/img-{i:04}.tif"),
                full_path: format!("VolumeA/ProjectX/2020-01-01/img-{i:04}.tif"),
                depth: 1,
            })
            .await
            .unwrap();
        ids.push(file.id);
    }

    // The repeat lands in a second chunk; the row must still come back
    // exactly once.
    ids.push(ids[0]);

    let fetched = files.find_by_ids(&ids).await.unwrap();
    assert_eq!(fetched.len(), 1000);

    let mut seen = std::collections::HashSet::new();
    assert!(fetched.iter().all(|f| seen.insert(f.id)));
}

#[tokio::test]
async fn batch_fetch_of_no_ids_is_empty() {
    let pool = test_pool().await;
    let files = FileRepository::new(pool);
    assert!(files.find_by_ids(&[]).await.unwrap().is_empty());
}
