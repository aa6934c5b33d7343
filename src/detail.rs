//! Project detail page: project record → view model → markup.
//!
//! The markup is written into `#project-container` by the web layer; the
//! gallery controls it contains are then wired to a [`crate::gallery::Gallery`].
//! Titles, tags and link labels are escaped by maud. The description is
//! markdown-lite output and goes in unescaped.

use maud::{Markup, PreEscaped, html};

use crate::markdown;
use crate::project::Project;

#[derive(Debug, Clone, PartialEq)]
pub struct DetailImage {
    pub src: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailLink {
    pub key: String,
    pub href: String,
    pub icon: &'static str,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub title: String,
    pub images: Vec<DetailImage>,
    pub technologies: Vec<String>,
    pub links: Vec<DetailLink>,
    pub description_html: String,
}

impl DetailView {
    pub fn from_project(project: &Project) -> Self {
        let images = project
            .images
            .iter()
            .enumerate()
            .map(|(i, src)| DetailImage {
                src: src.clone(),
                active: i == 0,
            })
            .collect();

        let links = project
            .links
            .iter()
            .filter_map(|link| {
                let href = link.href()?;
                let kind = link.kind();
                Some(DetailLink {
                    key: link.key.clone(),
                    href: href.to_string(),
                    icon: kind.icon(),
                    label: kind.label(&link.key).to_string(),
                })
            })
            .collect();

        Self {
            title: project.title.clone(),
            images,
            technologies: project.technologies.clone(),
            links,
            description_html: markdown::render(&project.description),
        }
    }

    /// Prev/next buttons and dots only make sense with several images.
    pub fn has_controls(&self) -> bool {
        self.images.len() > 1
    }

    pub fn render(&self) -> Markup {
        html! {
            div.project-top-section {
                div.project-image-container {
                    div.project-images-gallery {
                        @for (index, image) in self.images.iter().enumerate() {
                            img.project-image.active[image.active] src=(image.src) alt=(self.title) data-index=(index);
                        }
                    }
                    @if self.has_controls() {
                        (self.render_controls())
                    }
                }
                div.project-content {
                    h1.project-title { (self.title) }
                    @if !self.technologies.is_empty() {
                        div.project-technologies {
                            p.project-technologies-label { "Technologies:" }
                            div.project-technologies-list {
                                @for tech in &self.technologies {
                                    span.tech-tag { (tech) }
                                }
                            }
                        }
                    }
                    @if !self.links.is_empty() {
                        div.project-links-wrapper {
                            div.project-links {
                                @for link in &self.links {
                                    a.project-link href=(link.href) target="_blank" data-link=(link.key) {
                                        div.icon-circle {
                                            i class={ "fa-solid " (link.icon) } {}
                                        }
                                        span { (link.label) }
                                    }
                                }
                            }
                        }
                    }
                }
            }
            div.project-description-section {
                div.project-description-wrapper {
                    (PreEscaped(&self.description_html))
                }
            }
        }
    }

    fn render_controls(&self) -> Markup {
        html! {
            div.carousel-nav {
                button.carousel-btn.carousel-prev aria-label="Previous image" {
                    i.fa-solid.fa-chevron-left {}
                }
                div.carousel-dots {
                    @for (index, image) in self.images.iter().enumerate() {
                        span.carousel-dot.active[image.active] data-index=(index) {}
                    }
                }
                button.carousel-btn.carousel-next aria-label="Next image" {
                    i.fa-solid.fa-chevron-right {}
                }
            }
        }
    }
}
