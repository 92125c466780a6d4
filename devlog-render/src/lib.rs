//! # devlog-render
//!
//! Page templates for the devlog static blog generator.
//!
//! Templates are compiled with Askama. Page structs take prepared view data
//! ([`PostCard`], [`CategoryLink`], [`TagLink`]) and the shared [`Chrome`].

pub mod templates;
pub mod view;

pub use templates::{
    AboutTemplate, BlogTemplate, CategoriesTemplate, CategoryTemplate, ContactTemplate,
    HomeTemplate, NotFoundTemplate, PostTemplate, SearchTemplate, TagTemplate, TagsTemplate,
};
pub use view::{html_escape, CategoryLink, Chrome, I18n, Label, Links, Nav, PostCard, TagLink};
