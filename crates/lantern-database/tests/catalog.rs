//! Integration tests for the category and folder stores.

mod common;

use lantern_core::error::ErrorKind;
use lantern_database::repositories::{CategoryRepository, FolderRepository};

use common::test_pool;

#[tokio::test]
async fn find_or_create_category_is_idempotent() {
    let pool = test_pool().await;
    let repo = CategoryRepository::new(pool);

    let first = repo.find_or_create("ProjectX").await.unwrap();
    let second = repo.find_or_create("ProjectX").await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(repo.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn category_lookup_is_case_sensitive_but_listing_is_not() {
    let pool = test_pool().await;
    let repo = CategoryRepository::new(pool);

    repo.find_or_create("zebra").await.unwrap();
    repo.find_or_create("Alpha").await.unwrap();
    repo.find_or_create("ZEBRA").await.unwrap();

    let all = repo.list_all().await.unwrap();
    let names: Vec<&str> = all.iter().map(|c| c.name.as_str()).collect();
    // "zebra" and "ZEBRA" are distinct categories; ordering ignores case.
    assert_eq!(names, vec!["Alpha", "zebra", "ZEBRA"]);
}

#[tokio::test]
async fn find_or_create_folder_is_idempotent() {
    let pool = test_pool().await;
    let categories = CategoryRepository::new(pool.clone());
    let folders = FolderRepository::new(pool);

    let category = categories.find_or_create("ProjectX").await.unwrap();
    let top = folders
        .find_or_create(&category, None, "2020-01-01")
        .await
        .unwrap();
    let again = folders
        .find_or_create(&category, None, "2020-01-01")
        .await
        .unwrap();

    assert_eq!(top.id, again.id);
    assert_eq!(top.depth, 0);
    assert_eq!(top.name, "2020-01-01");
    assert!(top.is_top_level());
}

#[tokio::test]
async fn folder_name_and_depth_derive_from_public_path() {
    let pool = test_pool().await;
    let categories = CategoryRepository::new(pool.clone());
    let folders = FolderRepository::new(pool);

    let category = categories.find_or_create("ProjectX").await.unwrap();
    let top = folders
        .find_or_create(&category, None, "2020-01-01")
        .await
        .unwrap();
    let sub = folders
        .find_or_create(&category, Some(&top), "2020-01-01/scans/masters")
        .await
        .unwrap();

    assert_eq!(sub.name, "masters");
    assert_eq!(sub.depth, 2);
    assert_eq!(sub.parent_id, Some(top.id));
}

#[tokio::test]
async fn reparenting_an_existing_folder_is_a_conflict() {
    let pool = test_pool().await;
    let categories = CategoryRepository::new(pool.clone());
    let folders = FolderRepository::new(pool);

    let category = categories.find_or_create("ProjectX").await.unwrap();
    let parent_a = folders
        .find_or_create(&category, None, "2020-01-01")
        .await
        .unwrap();
    let parent_b = folders
        .find_or_create(&category, None, "2020-02-02")
        .await
        .unwrap();
    let child = folders
        .find_or_create(&category, Some(&parent_a), "2020-01-01/sub")
        .await
        .unwrap();

    let err = folders
        .find_or_create(&category, Some(&parent_b), "2020-01-01/sub")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    // The original row is untouched.
    let still = folders
        .find_by_path(&category, "2020-01-01/sub")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(still.id, child.id);
    assert_eq!(still.parent_id, Some(parent_a.id));
}

#[tokio::test]
async fn many_physical_directories_collapse_onto_one_folder() {
    let pool = test_pool().await;
    let categories = CategoryRepository::new(pool.clone());
    let folders = FolderRepository::new(pool);

    let category = categories.find_or_create("ProjectX").await.unwrap();
    let folder = folders
        .find_or_create(&category, None, "2020-01-01")
        .await
        .unwrap();

    let a = folders
        .find_or_create_real_folder(&folder, "VolumeA/ProjectX/2020-01-01")
        .await
        .unwrap();
    let b = folders
        .find_or_create_real_folder(&folder, "VolumeB/ProjectX/2020-01-01")
        .await
        .unwrap();
    let a_again = folders
        .find_or_create_real_folder(&folder, "VolumeA/ProjectX/2020-01-01")
        .await
        .unwrap();

    assert_ne!(a.id, b.id);
    assert_eq!(a.id, a_again.id);
}

#[tokio::test]
async fn reassigning_a_physical_directory_is_a_conflict() {
    let pool = test_pool().await;
    let categories = CategoryRepository::new(pool.clone());
    let folders = FolderRepository::new(pool);

    let category = categories.find_or_create("ProjectX").await.unwrap();
    let one = folders
        .find_or_create(&category, None, "2020-01-01")
        .await
        .unwrap();
    let other = folders
        .find_or_create(&category, None, "2020-02-02")
        .await
        .unwrap();

    folders
        .find_or_create_real_folder(&one, "VolumeA/ProjectX/2020-01-01")
        .await
        .unwrap();
    let err = folders
        .find_or_create_real_folder(&other, "VolumeA/ProjectX/2020-01-01")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn find_children_scopes_by_parent() {
    let pool = test_pool().await;
    let categories = CategoryRepository::new(pool.clone());
    let folders = FolderRepository::new(pool);

    let category = categories.find_or_create("ProjectX").await.unwrap();
    let top = folders
        .find_or_create(&category, None, "2020-01-01")
        .await
        .unwrap();
    folders
        .find_or_create(&category, Some(&top), "2020-01-01/b-sub")
        .await
        .unwrap();
    folders
        .find_or_create(&category, Some(&top), "2020-01-01/A-sub")
        .await
        .unwrap();

    let top_level = folders.find_children(&category, None).await.unwrap();
    assert_eq!(top_level.len(), 1);
    assert_eq!(top_level[0].id, top.id);

    let children = folders.find_children(&category, Some(&top)).await.unwrap();
    let names: Vec<&str> = children.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["A-sub", "b-sub"]);
}

#[tokio::test]
async fn folder_search_is_descendant_scoped_with_decoupled_total() {
    let pool = test_pool().await;
    let categories = CategoryRepository::new(pool.clone());
    let folders = FolderRepository::new(pool);

    let category = categories.find_or_create("ProjectX").await.unwrap();
    let top = folders
        .find_or_create(&category, None, "2020-01-01")
        .await
        .unwrap();
    for name in ["scans-a", "scans-b", "scans-c"] {
        folders
            .find_or_create(&category, Some(&top), &format!("2020-01-01/{name}"))
            .await
            .unwrap();
    }
    let elsewhere = folders
        .find_or_create(&category, None, "2020-09-09")
        .await
        .unwrap();
    folders
        .find_or_create(&category, Some(&elsewhere), "2020-09-09/scans-d")
        .await
        .unwrap();

    // Scoped under `top`: three matches regardless of limit.
    let (capped, total) = folders.search(&category, Some(&top), "scans", 1).await.unwrap();
    assert_eq!(capped.len(), 1);
    assert_eq!(total, 3);

    let (all, total) = folders
        .search(&category, Some(&top), "scans", 1000)
        .await
        .unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(total, 3);

    // Unscoped: the whole category.
    let (_, total) = folders.search(&category, None, "scans", 10).await.unwrap();
    assert_eq!(total, 4);

    // The root folder itself is not among its own descendants.
    let (hits, _) = folders
        .search(&category, Some(&top), "2020-01-01", 10)
        .await
        .unwrap();
    assert!(hits.iter().all(|f| f.id != top.id));
}

#[tokio::test]
async fn populate_categories_fills_folder_records() {
    let pool = test_pool().await;
    let categories = CategoryRepository::new(pool.clone());
    let folders = FolderRepository::new(pool);

    let category = categories.find_or_create("ProjectX").await.unwrap();
    folders
        .find_or_create(&category, None, "2020-01-01")
        .await
        .unwrap();

    let mut listed = folders.find_children(&category, None).await.unwrap();
    assert!(listed[0].category.is_none());

    categories
        .populate_categories(&mut [], &mut listed)
        .await
        .unwrap();
    assert_eq!(listed[0].category.as_ref().unwrap().name, "ProjectX");
}
