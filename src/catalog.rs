use crate::{
    error::{ImaginaError, Result},
    models::GeneratedImage,
    pagination::{clamp_page, page_count, paginate},
};

pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Generated images, newest first.
#[derive(Debug, Clone, Default)]
pub struct ImageCatalog {
    images: Vec<GeneratedImage>,
}

impl ImageCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, image: GeneratedImage) {
        log::debug!("Catalog: adding image {}", image.id);
        self.images.insert(0, image);
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn latest(&self) -> Option<&GeneratedImage> {
        self.images.first()
    }

    pub fn get(&self, id: &str) -> Option<&GeneratedImage> {
        self.images.iter().find(|image| image.id == id)
    }

    pub fn images(&self) -> &[GeneratedImage] {
        &self.images
    }

    /// Case-insensitive substring match on the prompt. An empty term matches everything.
    pub fn search(&self, term: &str) -> Vec<&GeneratedImage> {
        let needle = term.to_lowercase();
        self.images
            .iter()
            .filter(|image| needle.is_empty() || image.prompt.to_lowercase().contains(&needle))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LibraryPage<'a> {
    pub images: Vec<&'a GeneratedImage>,
    pub number: usize,
    pub total_pages: usize,
    pub total_matches: usize,
}

/// Search and pagination state of the library screen.
#[derive(Debug, Clone)]
pub struct LibraryView {
    search_term: String,
    current_page: usize,
    page_size: usize,
}

impl Default for LibraryView {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl LibraryView {
    pub fn new(page_size: usize) -> Self {
        Self {
            search_term: String::new(),
            current_page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.current_page = 1;
    }

    pub fn total_pages(&self, catalog: &ImageCatalog) -> usize {
        page_count(catalog.search(&self.search_term).len(), self.page_size)
    }

    /// Moves to `page`, leaving the current page untouched when it is out of range.
    pub fn go_to_page(&mut self, catalog: &ImageCatalog, page: usize) -> Result<()> {
        let total = self.total_pages(catalog);
        if page < 1 || page > total {
            return Err(ImaginaError::PageOutOfRange {
                requested: page,
                total,
            });
        }
        self.current_page = page;
        Ok(())
    }

    pub fn next_page(&mut self, catalog: &ImageCatalog) -> bool {
        self.go_to_page(catalog, self.current_page + 1).is_ok()
    }

    pub fn previous_page(&mut self, catalog: &ImageCatalog) -> bool {
        self.current_page > 1 && self.go_to_page(catalog, self.current_page - 1).is_ok()
    }

    pub fn page<'a>(&self, catalog: &'a ImageCatalog) -> LibraryPage<'a> {
        let matches = catalog.search(&self.search_term);
        let window = paginate(&matches, self.page_size, self.current_page);

        LibraryPage {
            images: window.items.to_vec(),
            number: clamp_page(self.current_page, matches.len(), self.page_size),
            total_pages: window.total_pages,
            total_matches: matches.len(),
        }
    }
}
