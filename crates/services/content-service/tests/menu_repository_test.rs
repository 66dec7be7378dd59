//! Menu repository tests against an in-memory SQLite database.

use common::{AppError, DatabaseConfig};
use content_service_lib::infra::Database;
use content_service_lib::repository::{MenuRepository, MenuStore};
use domain::{LocalisationInput, Menu, MenuItemStatus};
use uuid::Uuid;

struct Seeded {
    store: MenuStore,
    site_id: Uuid,
    main_menu_id: Uuid,
    footer_menu_id: Uuid,
    deleted_menu_id: Uuid,
    other_site_menu_id: Uuid,
    home_item_id: Uuid,
    english: Uuid,
    french: Uuid,
}

async fn setup() -> Seeded {
    let db = Database::connect(&DatabaseConfig::in_memory_sqlite())
        .await
        .expect("in-memory database");
    let store = MenuStore::new(db.get_connection());

    let site_id = Uuid::new_v4();
    let other_site_id = Uuid::new_v4();
    let english = Uuid::new_v4();
    let french = Uuid::new_v4();
    let home_item_id = Uuid::new_v4();
    let archive_item_id = Uuid::new_v4();

    // Main: one active item with localisations, one soft-deleted item
    let mut main = Menu::new(site_id, Uuid::new_v4(), "Main").unwrap();
    main.add_menu_item(
        home_item_id,
        "Home",
        vec![
            LocalisationInput::new(english, "Home"),
            LocalisationInput::new(french, "Accueil"),
        ],
    )
    .unwrap();
    main.add_menu_item(
        archive_item_id,
        "Archive",
        vec![LocalisationInput::new(french, "Archives")],
    )
    .unwrap();
    main.remove_menu_item(archive_item_id).unwrap();
    store.create(&main).await.unwrap();

    let mut footer = Menu::new(site_id, Uuid::new_v4(), "Footer").unwrap();
    let legal_item_id = Uuid::new_v4();
    footer
        .add_menu_item(legal_item_id, "Legal", vec![])
        .unwrap();
    footer.remove_menu_item(legal_item_id).unwrap();
    store.create(&footer).await.unwrap();

    let mut deleted = Menu::new(site_id, Uuid::new_v4(), "Old").unwrap();
    deleted.delete().unwrap();
    store.create(&deleted).await.unwrap();

    let other_site = Menu::new(other_site_id, Uuid::new_v4(), "Main").unwrap();
    store.create(&other_site).await.unwrap();

    Seeded {
        store,
        site_id,
        main_menu_id: main.id,
        footer_menu_id: footer.id,
        deleted_menu_id: deleted.id,
        other_site_menu_id: other_site.id,
        home_item_id,
        english,
        french,
    }
}

fn assert_no_deleted_items(menu: &Menu) {
    assert!(menu
        .menu_items
        .iter()
        .all(|item| item.status != MenuItemStatus::Deleted));
}

#[tokio::test]
async fn test_get_by_id_excludes_deleted_items() {
    let seeded = setup().await;

    let menu = seeded
        .store
        .get_by_id(seeded.main_menu_id)
        .await
        .unwrap()
        .expect("menu exists");

    assert_eq!(menu.menu_items.len(), 1);
    assert_eq!(menu.menu_items[0].id, seeded.home_item_id);
    assert_eq!(menu.menu_items[0].menu_item_localisations.len(), 2);
    assert_no_deleted_items(&menu);
}

#[tokio::test]
async fn test_get_by_id_ignores_site() {
    let seeded = setup().await;

    let menu = seeded
        .store
        .get_by_id(seeded.other_site_menu_id)
        .await
        .unwrap();

    assert!(menu.is_some());
    assert_ne!(menu.unwrap().site_id, seeded.site_id);
}

#[tokio::test]
async fn test_get_by_id_missing() {
    let seeded = setup().await;
    assert!(seeded.store.get_by_id(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_get_by_site_and_id() {
    let seeded = setup().await;

    let menu = seeded
        .store
        .get_by_site_and_id(seeded.site_id, seeded.main_menu_id)
        .await
        .unwrap()
        .expect("menu exists");
    assert_no_deleted_items(&menu);

    // Every item of Footer is soft-deleted
    let footer = seeded
        .store
        .get_by_site_and_id(seeded.site_id, seeded.footer_menu_id)
        .await
        .unwrap()
        .expect("menu exists");
    assert!(footer.menu_items.is_empty());

    let wrong_site = seeded
        .store
        .get_by_site_and_id(Uuid::new_v4(), seeded.main_menu_id)
        .await
        .unwrap();
    assert!(wrong_site.is_none());
}

#[tokio::test]
async fn test_get_by_site_and_id_returns_deleted_menu() {
    let seeded = setup().await;

    let menu = seeded
        .store
        .get_by_site_and_id(seeded.site_id, seeded.deleted_menu_id)
        .await
        .unwrap()
        .expect("menu exists");

    assert!(menu.is_deleted());
}

#[tokio::test]
async fn test_get_by_name() {
    let seeded = setup().await;

    let menu = seeded
        .store
        .get_by_name(seeded.site_id, "Main")
        .await
        .unwrap()
        .expect("menu exists");
    assert_eq!(menu.id, seeded.main_menu_id);
    assert_no_deleted_items(&menu);

    let deleted = seeded.store.get_by_name(seeded.site_id, "Old").await.unwrap();
    assert!(deleted.is_none());
}

#[tokio::test]
async fn test_get_all_excludes_deleted_menus_and_other_sites() {
    let seeded = setup().await;

    let menus = seeded.store.get_all(seeded.site_id).await.unwrap();

    assert_eq!(menus.len(), 2);
    assert!(menus.iter().all(|m| m.site_id == seeded.site_id));
    assert!(menus.iter().all(|m| !m.is_deleted()));
    for menu in &menus {
        assert_no_deleted_items(menu);
    }
}

#[tokio::test]
async fn test_create_then_read_back() {
    let seeded = setup().await;

    let mut menu = Menu::new(seeded.site_id, Uuid::new_v4(), "Sidebar").unwrap();
    for text in ["Contact", "About", "Careers"] {
        menu.add_menu_item(
            Uuid::new_v4(),
            text,
            vec![
                LocalisationInput::new(seeded.french, text),
                LocalisationInput::new(seeded.english, text),
            ],
        )
        .unwrap();
    }
    seeded.store.create(&menu).await.unwrap();

    let stored = seeded
        .store
        .get_by_site_and_id(seeded.site_id, menu.id)
        .await
        .unwrap()
        .expect("menu exists");

    // Items load in id order, localisations in language order
    menu.menu_items.sort_by_key(|item| item.id);
    for item in &mut menu.menu_items {
        item.menu_item_localisations.sort_by_key(|l| l.language_id);
    }
    assert_eq!(stored, menu);
}

#[tokio::test]
async fn test_create_rolls_back_when_an_item_fails() {
    let seeded = setup().await;

    // The item id already belongs to the Main menu
    let mut menu = Menu::new(seeded.site_id, Uuid::new_v4(), "Sidebar").unwrap();
    menu.add_menu_item(seeded.home_item_id, "Home", vec![]).unwrap();

    assert!(seeded.store.create(&menu).await.is_err());

    assert!(seeded.store.get_by_id(menu.id).await.unwrap().is_none());
    let main = seeded
        .store
        .get_by_id(seeded.main_menu_id)
        .await
        .unwrap()
        .expect("menu exists");
    assert_eq!(main.menu_items.len(), 1);
    assert_eq!(main.menu_items[0].text, "Home");
}

#[tokio::test]
async fn test_update_rolls_back_when_an_item_fails() {
    let seeded = setup().await;

    let mut footer = seeded
        .store
        .get_by_site_and_id(seeded.site_id, seeded.footer_menu_id)
        .await
        .unwrap()
        .expect("menu exists");

    // The rename is written before the conflicting item insert
    footer.rename("Bottom").unwrap();
    footer
        .add_menu_item(Uuid::new_v4(), "Privacy", vec![])
        .unwrap();
    footer
        .add_menu_item(seeded.home_item_id, "Home", vec![])
        .unwrap();

    assert!(seeded.store.update(&footer).await.is_err());

    let stored = seeded
        .store
        .get_by_site_and_id(seeded.site_id, seeded.footer_menu_id)
        .await
        .unwrap()
        .expect("menu exists");
    assert_eq!(stored.name, "Footer");
    assert!(stored.menu_items.is_empty());
    assert!(seeded
        .store
        .get_by_name(seeded.site_id, "Bottom")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_update_replaces_mutable_fields() {
    let seeded = setup().await;

    let mut menu = seeded
        .store
        .get_by_site_and_id(seeded.site_id, seeded.main_menu_id)
        .await
        .unwrap()
        .expect("menu exists");

    menu.rename("Main navigation").unwrap();
    menu.update_menu_item(
        seeded.home_item_id,
        "Start",
        vec![LocalisationInput::new(seeded.french, "Début")],
    )
    .unwrap();
    seeded.store.update(&menu).await.unwrap();

    let updated = seeded
        .store
        .get_by_site_and_id(seeded.site_id, seeded.main_menu_id)
        .await
        .unwrap()
        .expect("menu exists");

    assert_eq!(updated.name, "Main navigation");
    assert_eq!(updated.menu_items.len(), 1);
    let item = &updated.menu_items[0];
    assert_eq!(item.text, "Start");
    assert_eq!(item.localised_text(seeded.french), Some("Début"));
    // Dropped from the item, so removed from storage
    assert_eq!(item.localised_text(seeded.english), None);
}

#[tokio::test]
async fn test_update_soft_deletes_and_adds_items() {
    let seeded = setup().await;

    let mut menu = seeded
        .store
        .get_by_id(seeded.main_menu_id)
        .await
        .unwrap()
        .expect("menu exists");

    let new_item_id = Uuid::new_v4();
    menu.remove_menu_item(seeded.home_item_id).unwrap();
    menu.add_menu_item(new_item_id, "Blog", vec![]).unwrap();
    seeded.store.update(&menu).await.unwrap();

    let updated = seeded
        .store
        .get_by_id(seeded.main_menu_id)
        .await
        .unwrap()
        .expect("menu exists");

    assert_eq!(updated.menu_items.len(), 1);
    assert_eq!(updated.menu_items[0].id, new_item_id);
    assert_no_deleted_items(&updated);
}

#[tokio::test]
async fn test_update_missing_menu() {
    let seeded = setup().await;
    let menu = Menu::new(seeded.site_id, Uuid::new_v4(), "Ghost").unwrap();

    let result = seeded.store.update(&menu).await;

    assert!(matches!(result, Err(AppError::NotFound)));
}
