//! Card renderer: maps one product and its bound actions to a view description.
//!
//! Rendering is pure. The host turns a [`CardView`] into real nodes through
//! its [`crate::view::ViewSurface`] and reports clicks back through
//! [`dispatch_click`].
use smallvec::{SmallVec, smallvec};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::constants::{
    CARD_CLASS, CONSULT_LABEL, CONTACT_LABEL, PRICE_SYMBOL, PURCHASE_LABEL, QUICK_VIEW_LABEL,
};
use crate::product::{ChangedFields, Product, ProductField, Theme};
use crate::view::Pose;

/// Caller-supplied action hook, invoked with the product and its rendered node.
pub type CardCallback<N> = Rc<dyn Fn(&Product, &N)>;

/// Interactive controls a card can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardControl {
    QuickView,
    AddToCart,
    Contact,
    /// The card body itself.
    Card,
}

/// Whether a click keeps bubbling to enclosing handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Stopped,
    Continue,
}

/// Typed action bag. Only bound actions produce controls.
pub struct CardActions<N> {
    pub on_quick_view: Option<CardCallback<N>>,
    pub on_add_to_cart: Option<CardCallback<N>>,
    pub on_contact: Option<CardCallback<N>>,
    pub on_click: Option<CardCallback<N>>,
}

impl<N> Default for CardActions<N> {
    fn default() -> Self {
        Self {
            on_quick_view: None,
            on_add_to_cart: None,
            on_contact: None,
            on_click: None,
        }
    }
}

impl<N> Clone for CardActions<N> {
    fn clone(&self) -> Self {
        Self {
            on_quick_view: self.on_quick_view.clone(),
            on_add_to_cart: self.on_add_to_cart.clone(),
            on_contact: self.on_contact.clone(),
            on_click: self.on_click.clone(),
        }
    }
}

impl<N> fmt::Debug for CardActions<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardActions")
            .field("bound", &self.bound())
            .finish()
    }
}

fn chain<N: 'static>(
    first: Option<&CardCallback<N>>,
    second: Option<&CardCallback<N>>,
) -> Option<CardCallback<N>> {
    match (first, second) {
        (Some(first), Some(second)) => {
            let (first, second) = (Rc::clone(first), Rc::clone(second));
            let both: CardCallback<N> = Rc::new(move |product: &Product, node: &N| {
                first(product, node);
                second(product, node);
            });
            Some(both)
        }
        (Some(only), None) | (None, Some(only)) => Some(Rc::clone(only)),
        (None, None) => None,
    }
}

impl<N: 'static> CardActions<N> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_quick_view(mut self, callback: impl Fn(&Product, &N) + 'static) -> Self {
        self.on_quick_view = Some(Rc::new(callback));
        self
    }

    #[must_use]
    pub fn with_add_to_cart(mut self, callback: impl Fn(&Product, &N) + 'static) -> Self {
        self.on_add_to_cart = Some(Rc::new(callback));
        self
    }

    #[must_use]
    pub fn with_contact(mut self, callback: impl Fn(&Product, &N) + 'static) -> Self {
        self.on_contact = Some(Rc::new(callback));
        self
    }

    #[must_use]
    pub fn with_click(mut self, callback: impl Fn(&Product, &N) + 'static) -> Self {
        self.on_click = Some(Rc::new(callback));
        self
    }

    /// Grid-wide actions followed by per-product ones; both fire when both are bound.
    #[must_use]
    pub fn merged(&self, local: &Self) -> Self {
        Self {
            on_quick_view: chain(self.on_quick_view.as_ref(), local.on_quick_view.as_ref()),
            on_add_to_cart: chain(self.on_add_to_cart.as_ref(), local.on_add_to_cart.as_ref()),
            on_contact: chain(self.on_contact.as_ref(), local.on_contact.as_ref()),
            on_click: chain(self.on_click.as_ref(), local.on_click.as_ref()),
        }
    }
}

impl<N> CardActions<N> {
    #[must_use]
    pub const fn bound(&self) -> BoundActions {
        BoundActions {
            quick_view: self.on_quick_view.is_some(),
            add_to_cart: self.on_add_to_cart.is_some(),
            contact: self.on_contact.is_some(),
            click: self.on_click.is_some(),
        }
    }

    /// Drop every callback `bound` does not list.
    #[must_use]
    pub fn restricted_to(&self, bound: BoundActions) -> Self {
        let keep = |on: bool, callback: &Option<CardCallback<N>>| {
            if on { callback.clone() } else { None }
        };
        Self {
            on_quick_view: keep(bound.quick_view, &self.on_quick_view),
            on_add_to_cart: keep(bound.add_to_cart, &self.on_add_to_cart),
            on_contact: keep(bound.contact, &self.on_contact),
            on_click: keep(bound.click, &self.on_click),
        }
    }

    #[must_use]
    pub const fn callback(&self, control: CardControl) -> Option<&CardCallback<N>> {
        match control {
            CardControl::QuickView => self.on_quick_view.as_ref(),
            CardControl::AddToCart => self.on_add_to_cart.as_ref(),
            CardControl::Contact => self.on_contact.as_ref(),
            CardControl::Card => self.on_click.as_ref(),
        }
    }
}

/// Which actions are bound, without the callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoundActions {
    pub quick_view: bool,
    pub add_to_cart: bool,
    pub contact: bool,
    pub click: bool,
}

/// The single highest-priority button in a card footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryAction {
    /// Funeral cards with a contact hook.
    Contact,
    Purchase,
    Consult,
}

impl PrimaryAction {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Contact => CONTACT_LABEL,
            Self::Purchase => PURCHASE_LABEL,
            Self::Consult => CONSULT_LABEL,
        }
    }

    #[must_use]
    pub const fn control(self) -> CardControl {
        match self {
            Self::Contact | Self::Consult => CardControl::Contact,
            Self::Purchase => CardControl::AddToCart,
        }
    }

    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Contact | Self::Consult => "contact-btn",
            Self::Purchase => "add-to-cart-btn",
        }
    }

    #[must_use]
    pub const fn view(self) -> ControlView {
        ControlView {
            control: self.control(),
            label: self.label(),
            css_class: self.css_class(),
        }
    }
}

/// Fixed decision table: funeral+contact, then cart, then contact, then nothing.
#[must_use]
pub const fn select_primary_action(theme: Theme, bound: BoundActions) -> Option<PrimaryAction> {
    if matches!(theme, Theme::Funeral) && bound.contact {
        Some(PrimaryAction::Contact)
    } else if bound.add_to_cart {
        Some(PrimaryAction::Purchase)
    } else if bound.contact {
        Some(PrimaryAction::Consult)
    } else {
        None
    }
}

/// A button in the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlView {
    pub control: CardControl,
    pub label: &'static str,
    pub css_class: &'static str,
}

const QUICK_VIEW_CONTROL: ControlView = ControlView {
    control: CardControl::QuickView,
    label: QUICK_VIEW_LABEL,
    css_class: "quick-view-btn",
};

pub type CardClasses = SmallVec<[String; 3]>;

/// Declarative description of one rendered card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub product_id: String,
    pub theme: Theme,
    pub classes: CardClasses,
    pub name: String,
    pub description: String,
    pub image: String,
    pub alt_text: String,
    pub price_label: Option<String>,
    pub category_badge: Option<String>,
    pub quick_view: Option<ControlView>,
    pub primary: Option<ControlView>,
    /// The card body carries a click handler.
    pub clickable: bool,
    pub custom_styles: BTreeMap<String, String>,
    /// Cards start hidden and are revealed on first viewport entry.
    pub initial_pose: Pose,
}

impl CardView {
    /// `data-*` attributes of the card root.
    #[must_use]
    pub fn data_attributes(&self) -> [(&'static str, &str); 2] {
        [
            ("data-product-id", self.product_id.as_str()),
            ("data-product-theme", self.theme.as_str()),
        ]
    }

    /// Every interactive control, innermost first.
    pub fn controls(&self) -> impl Iterator<Item = CardControl> + '_ {
        self.quick_view
            .iter()
            .chain(self.primary.iter())
            .map(|control| control.control)
            .chain(self.clickable.then_some(CardControl::Card))
    }
}

#[must_use]
pub fn card_classes(theme: Theme, category: Option<&str>) -> CardClasses {
    let mut classes: CardClasses = smallvec![
        CARD_CLASS.to_string(),
        format!("{CARD_CLASS}--{}", theme.as_str()),
    ];
    if let Some(category) = category {
        classes.push(format!("{CARD_CLASS}--{category}"));
    }
    classes
}

#[must_use]
pub fn price_label(price: &str) -> String {
    format!("{PRICE_SYMBOL}{price}")
}

/// Render one product. Pure.
#[must_use]
pub fn render_card(product: &Product, bound: BoundActions) -> CardView {
    CardView {
        product_id: product.id.clone(),
        theme: product.theme,
        classes: card_classes(product.theme, product.category.as_deref()),
        name: product.name.clone(),
        description: product.description.clone(),
        image: product.image.clone(),
        alt_text: product.alt_text.clone(),
        price_label: product.price.as_deref().map(price_label),
        category_badge: product.category.clone(),
        quick_view: bound.quick_view.then_some(QUICK_VIEW_CONTROL),
        primary: select_primary_action(product.theme, bound).map(PrimaryAction::view),
        clickable: bound.click,
        custom_styles: product.custom_styles.clone(),
        initial_pose: Pose::Hidden,
    }
}

/// In-place update pushed to a live card. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<ImagePatch>,
    pub price_label: Option<String>,
    pub category_badge: Option<String>,
    pub classes: Option<CardClasses>,
    /// Set when the primary control must be swapped; the inner `None` removes it.
    pub primary: Option<Option<ControlView>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePatch {
    pub src: String,
    pub alt: String,
}

impl CardPatch {
    /// Patch for a product whose `changed` fields were just merged.
    #[must_use]
    pub fn for_changes(
        product: &Product,
        changed: &ChangedFields,
        bound: BoundActions,
    ) -> Option<Self> {
        let mut patch = Self::default();
        for field in changed {
            match field {
                ProductField::Name => patch.name = Some(product.name.clone()),
                ProductField::Description => {
                    patch.description = Some(product.description.clone());
                }
                ProductField::Image | ProductField::AltText => {
                    patch.image = Some(ImagePatch {
                        src: product.image.clone(),
                        alt: product.alt_text.clone(),
                    });
                }
                ProductField::Price => patch.price_label = product.price.as_deref().map(price_label),
                ProductField::Category => {
                    patch.category_badge.clone_from(&product.category);
                    patch.classes = Some(card_classes(product.theme, product.category.as_deref()));
                }
                ProductField::Theme => {
                    patch.classes = Some(card_classes(product.theme, product.category.as_deref()));
                    patch.primary =
                        Some(select_primary_action(product.theme, bound).map(PrimaryAction::view));
                }
            }
        }
        (patch != Self::default()).then_some(patch)
    }
}

/// Result of routing a click through a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickOutcome {
    /// The control whose callback ran, if any.
    pub invoked: Option<CardControl>,
    pub propagation: Propagation,
}

/// Route a click on `target` through the card's handlers.
///
/// Action controls invoke their hook and stop propagation, so the card-level
/// click never sees them. A click on the card body, or on a control with no
/// hook, reaches `on_click`.
pub fn dispatch_click<N>(
    actions: &CardActions<N>,
    product: &Product,
    node: &N,
    target: CardControl,
) -> ClickOutcome {
    if target != CardControl::Card
        && let Some(callback) = actions.callback(target)
    {
        callback(product, node);
        return ClickOutcome {
            invoked: Some(target),
            propagation: Propagation::Stopped,
        };
    }
    if let Some(callback) = actions.on_click.as_ref() {
        callback(product, node);
        return ClickOutcome {
            invoked: Some(CardControl::Card),
            propagation: Propagation::Continue,
        };
    }
    ClickOutcome {
        invoked: None,
        propagation: Propagation::Continue,
    }
}

/// Entry animation state of a rendered card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryState {
    #[default]
    Pending,
    Shown,
}

impl EntryState {
    /// Mark the card as having entered the viewport. True only the first time.
    pub fn reveal(&mut self) -> bool {
        match self {
            Self::Pending => {
                *self = Self::Shown;
                true
            }
            Self::Shown => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::{IdGenerator, ProductDraft, ProductPatch};
    use std::cell::RefCell;

    fn product(theme: Theme) -> Product {
        ProductDraft::named("Corona Funeraria 1")
            .with_id("corona-1")
            .with_category("coronas")
            .with_price("2,100")
            .with_theme(theme)
            .normalize(Theme::Default, &mut IdGenerator::seeded(0), |_| false)
    }

    const fn bound(quick_view: bool, add_to_cart: bool, contact: bool) -> BoundActions {
        BoundActions {
            quick_view,
            add_to_cart,
            contact,
            click: false,
        }
    }

    #[test]
    fn primary_action_decision_table() {
        let cases = [
            (Theme::Funeral, bound(false, true, true), Some(PrimaryAction::Contact)),
            (Theme::Funeral, bound(false, true, false), Some(PrimaryAction::Purchase)),
            (Theme::Funeral, bound(false, false, false), None),
            (Theme::Default, bound(false, true, true), Some(PrimaryAction::Purchase)),
            (Theme::Default, bound(false, false, true), Some(PrimaryAction::Consult)),
            (Theme::Default, bound(true, false, false), None),
        ];
        for (theme, actions, expected) in cases {
            assert_eq!(select_primary_action(theme, actions), expected, "{theme:?} {actions:?}");
        }
        assert_eq!(PrimaryAction::Contact.label(), "Contactanos");
        assert_eq!(PrimaryAction::Purchase.label(), "COMPRAR");
        assert_eq!(PrimaryAction::Consult.label(), "CONSULTAR");
        assert_eq!(QUICK_VIEW_CONTROL.label, "Vista Rápida");
        assert_eq!(PrimaryAction::Consult.control(), CardControl::Contact);
    }

    #[test]
    fn only_bound_actions_render_controls() {
        let view = render_card(&product(Theme::Default), BoundActions::default());
        assert!(view.quick_view.is_none());
        assert!(view.primary.is_none());
        assert_eq!(view.controls().count(), 0);

        let view = render_card(
            &product(Theme::Funeral),
            BoundActions {
                quick_view: true,
                contact: true,
                click: true,
                add_to_cart: false,
            },
        );
        let controls: Vec<_> = view.controls().collect();
        assert_eq!(
            controls,
            [CardControl::QuickView, CardControl::Contact, CardControl::Card]
        );
        assert_eq!(view.primary.map(|c| c.label), Some(CONTACT_LABEL));
    }

    #[test]
    fn render_describes_classes_badge_and_price() {
        let view = render_card(&product(Theme::Funeral), BoundActions::default());
        assert_eq!(
            view.classes.as_slice(),
            ["product-card", "product-card--funeral", "product-card--coronas"]
        );
        assert_eq!(view.price_label.as_deref(), Some("$2,100"));
        assert_eq!(view.category_badge.as_deref(), Some("coronas"));
        assert_eq!(view.initial_pose, Pose::Hidden);
        assert_eq!(
            view.data_attributes(),
            [("data-product-id", "corona-1"), ("data-product-theme", "funeral")]
        );
    }

    #[test]
    fn action_clicks_stop_before_card_handler() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let log = |label: &'static str| {
            let calls = Rc::clone(&calls);
            move |p: &Product, _node: &u32| calls.borrow_mut().push((label, p.id.clone()))
        };
        let actions = CardActions::<u32>::new()
            .with_contact(log("contact"))
            .with_click(log("card"));
        let p = product(Theme::Funeral);

        let outcome = dispatch_click(&actions, &p, &7, CardControl::Contact);
        assert_eq!(outcome.propagation, Propagation::Stopped);
        assert_eq!(outcome.invoked, Some(CardControl::Contact));
        assert_eq!(*calls.borrow(), [("contact", "corona-1".to_string())]);

        let outcome = dispatch_click(&actions, &p, &7, CardControl::Card);
        assert_eq!(outcome.invoked, Some(CardControl::Card));
        assert_eq!(calls.borrow().len(), 2);

        // No cart hook: the click falls through to the card body.
        let outcome = dispatch_click(&actions, &p, &7, CardControl::AddToCart);
        assert_eq!(outcome.invoked, Some(CardControl::Card));
        assert_eq!(outcome.propagation, Propagation::Continue);
    }

    #[test]
    fn merged_actions_fire_global_then_local() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let global = {
            let order = Rc::clone(&order);
            CardActions::<()>::new().with_quick_view(move |_, _| order.borrow_mut().push("global"))
        };
        let local = {
            let order = Rc::clone(&order);
            CardActions::<()>::new()
                .with_quick_view(move |_, _| order.borrow_mut().push("local"))
                .with_contact(|_, _| {})
        };
        let merged = global.merged(&local);
        assert!(merged.bound().contact);
        dispatch_click(&merged, &product(Theme::Default), &(), CardControl::QuickView);
        assert_eq!(*order.borrow(), ["global", "local"]);
    }

    #[test]
    fn restricted_actions_keep_only_rendered_controls() {
        let actions = CardActions::<()>::new()
            .with_quick_view(|_, _| {})
            .with_add_to_cart(|_, _| {})
            .with_click(|_, _| {});
        let restricted = actions.restricted_to(bound(true, false, false));
        assert_eq!(restricted.bound(), bound(true, false, false));

        let outcome = dispatch_click(&restricted, &product(Theme::Default), &(), CardControl::AddToCart);
        assert_eq!(outcome.invoked, None);
        assert_eq!(outcome.propagation, Propagation::Continue);
    }

    #[test]
    fn patch_covers_changed_fields_only() {
        let mut p = product(Theme::Default);
        let changed = ProductPatch {
            name: Some("Corona Blanca".into()),
            image: Some("corona-blanca.png".into()),
            ..ProductPatch::default()
        }
        .apply_to(&mut p);
        let patch = CardPatch::for_changes(&p, &changed, BoundActions::default()).unwrap();
        assert_eq!(patch.name.as_deref(), Some("Corona Blanca"));
        assert_eq!(
            patch.image,
            Some(ImagePatch {
                src: "corona-blanca.png".into(),
                alt: "Corona Funeraria 1".into()
            })
        );
        assert!(patch.description.is_none());
        assert!(patch.price_label.is_none());
        assert!(CardPatch::for_changes(&p, &ChangedFields::new(), BoundActions::default()).is_none());
    }

    #[test]
    fn theme_change_swaps_primary_control() {
        let mut p = product(Theme::Default);
        let changed = ProductPatch {
            theme: Some(Theme::Funeral),
            ..ProductPatch::default()
        }
        .apply_to(&mut p);
        let patch = CardPatch::for_changes(&p, &changed, bound(false, true, true)).unwrap();
        assert_eq!(patch.primary, Some(Some(PrimaryAction::Contact.view())));
    }

    #[test]
    fn entry_reveals_once() {
        let mut entry = EntryState::default();
        assert!(entry.reveal());
        assert!(!entry.reveal());
        assert_eq!(entry, EntryState::Shown);
    }
}
