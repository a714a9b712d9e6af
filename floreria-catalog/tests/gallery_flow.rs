use std::cell::RefCell;
use std::rc::Rc;

use floreria_catalog::constants::{CONTACT_LABEL, PURCHASE_LABEL, QUICK_VIEW_LABEL};
use floreria_catalog::{
    CardActions, CardControl, CatalogConfig, CatalogController, Gallery, HeadlessSurface,
    IdGenerator, KeyOutcome, ModalKey, ModalNavigator, Navigation, NodeId, OverlayTarget, Product,
    ProductDraft, Propagation, featured_products, filter_buttons, funeral_catalog,
    gallery_actions,
};

fn funeral_gallery() -> Gallery<HeadlessSurface> {
    let source = funeral_catalog();
    let catalog = CatalogController::mount_with_ids(
        CatalogConfig::funeral_gallery("funeral-grid", source.products()),
        gallery_actions(|_: &Product, _: &NodeId| {}),
        HeadlessSurface::with_container("funeral-grid"),
        IdGenerator::seeded(21),
    );
    Gallery::new(catalog, ModalNavigator::new(), filter_buttons(source))
}

#[test]
fn three_item_sequence_navigation() {
    let mut gallery = funeral_gallery();
    gallery.filter("cruces");
    for id in ["cruz-4", "cruz-5", "cruz-6", "cruz-7", "cruz-8"] {
        gallery.catalog_mut().remove(id);
    }
    assert_eq!(gallery.catalog().visible().len(), 3);

    let opened = gallery.quick_view("cruz-2").map(|p| p.id.clone());
    assert_eq!(opened.as_deref(), Some("cruz-2"));
    assert_eq!(gallery.next(), Navigation::Moved { index: 2 });
    assert!(gallery.modal().buttons().next_disabled);
    assert_eq!(gallery.next(), Navigation::AtBoundary);
    assert_eq!(gallery.modal().current_index(), Some(2));

    gallery.close();
    gallery.quick_view("cruz-1");
    assert_eq!(gallery.prev(), Navigation::AtBoundary);
    assert!(gallery.modal().buttons().prev_disabled);
}

#[test]
fn quick_view_uses_filtered_sequence_not_full_catalog() {
    let mut gallery = funeral_gallery();
    assert_eq!(gallery.catalog().visible().len(), 50);
    gallery.filter("pie-caja-altar");
    let outcome = gallery
        .click("centro-altar-premium", CardControl::QuickView)
        .unwrap();
    assert_eq!(outcome.propagation, Propagation::Stopped);

    let view = gallery.modal().view().unwrap();
    assert_eq!(view.total, 4);
    assert_eq!(view.position, 2);
    assert_eq!(view.product.price.as_deref(), Some("3,450"));
}

#[test]
fn escape_and_backdrop_close_the_lightbox() {
    let mut gallery = funeral_gallery();
    gallery.filter("coronas");
    gallery.quick_view("corona-10");
    assert!(gallery.modal().scroll_locked());
    assert_eq!(gallery.handle_key(ModalKey::from_key_name("Escape")), KeyOutcome::Closed);
    assert!(!gallery.modal().scroll_locked());

    gallery.quick_view("corona-10");
    assert!(!gallery.overlay_click(OverlayTarget::Dialog));
    assert!(gallery.overlay_click(OverlayTarget::Backdrop));
    assert!(!gallery.modal().is_open());
}

#[test]
fn funeral_contact_beats_cart_in_storefront_too() {
    let added = Rc::new(RefCell::new(Vec::<String>::new()));
    let contacted = Rc::new(RefCell::new(Vec::<String>::new()));
    let actions = {
        let added = Rc::clone(&added);
        let contacted = Rc::clone(&contacted);
        CardActions::new()
            .with_quick_view(|_: &Product, _: &NodeId| {})
            .with_add_to_cart(move |p: &Product, _: &NodeId| added.borrow_mut().push(p.id.clone()))
            .with_contact(move |p: &Product, _: &NodeId| {
                contacted.borrow_mut().push(p.id.clone());
            })
    };
    let mut drafts = featured_products().to_vec();
    drafts.push(
        ProductDraft::named("Corona Blanca")
            .with_id("corona-blanca")
            .with_theme(floreria_catalog::Theme::Funeral),
    );
    let catalog = CatalogController::mount_with_ids(
        CatalogConfig::flower_shop("shop", drafts),
        actions,
        HeadlessSurface::with_container("shop"),
        IdGenerator::seeded(8),
    );

    let storefront = catalog.surface().cards().first().unwrap();
    assert_eq!(storefront.primary.map(|c| c.label), Some(PURCHASE_LABEL));
    assert_eq!(storefront.quick_view.map(|c| c.label), Some(QUICK_VIEW_LABEL));
    let funeral = catalog.surface().card("corona-blanca").unwrap();
    assert_eq!(funeral.primary.map(|c| c.label), Some(CONTACT_LABEL));

    let first = storefront.product_id.clone();
    catalog.click(&first, CardControl::AddToCart);
    catalog.click("corona-blanca", CardControl::Contact);
    assert_eq!(*added.borrow(), [first]);
    assert_eq!(*contacted.borrow(), ["corona-blanca"]);
}

#[test]
fn teardown_closes_modal_and_clears_grid() {
    let mut gallery = funeral_gallery();
    gallery.quick_view("cruz-1");
    gallery.teardown();
    assert!(!gallery.modal().is_open());
    assert!(gallery.catalog().surface().cards().is_empty());
    assert!(gallery.catalog().surface().decoration().is_none());
}
