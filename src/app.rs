use std::time::Duration;

use crate::{
    catalog::{ImageCatalog, LibraryPage, LibraryView},
    config::Config,
    error::{ImaginaError, Result},
    generator::ImageGenerator,
    ledger,
    lifecycle::GenerationLifecycle,
    models::{
        find_package, CreditPackage, GeneratedImage, ImageSize, Orientation, Payment, Role,
        User, CREDIT_PACKAGES,
    },
    router::{Router, View},
};

/// Everything the screens read and write. All mutation goes through the methods here.
#[derive(Debug, Clone)]
pub struct AppState {
    user: User,
    catalog: ImageCatalog,
    router: Router,
    lifecycle: GenerationLifecycle,
    library: LibraryView,
    payments: Vec<Payment>,
    timeout: Duration,
}

impl AppState {
    pub fn new(user: User) -> Self {
        Self {
            user,
            catalog: ImageCatalog::new(),
            router: Router::new(),
            lifecycle: GenerationLifecycle::new(),
            library: LibraryView::default(),
            payments: Vec::new(),
            timeout: Config::default().gemini.timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let user = User::new("1", config.user_email.clone(), config.starting_credits);
        Self {
            library: LibraryView::new(config.page_size),
            timeout: config.gemini.timeout,
            ..Self::new(user)
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn credits(&self) -> u32 {
        self.user.credits
    }

    pub fn catalog(&self) -> &ImageCatalog {
        &self.catalog
    }

    pub fn lifecycle(&self) -> &GenerationLifecycle {
        &self.lifecycle
    }

    pub fn library(&self) -> &LibraryView {
        &self.library
    }

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn current_view(&self) -> View {
        self.router.current()
    }

    pub fn is_generating(&self) -> bool {
        self.lifecycle.is_busy()
    }

    pub fn packages(&self) -> &'static [CreditPackage] {
        &CREDIT_PACKAGES
    }

    pub fn navigate(&mut self, view: View) -> View {
        self.router.navigate(view, self.user.role)
    }

    /// Runs one generation. On success the image is recorded and its cost debited together.
    pub async fn generate(
        &mut self,
        generator: &dyn ImageGenerator,
        prompt: &str,
        orientation: Orientation,
        size: ImageSize,
    ) -> Result<&GeneratedImage> {
        let balance = self.user.credits;
        let image = self
            .lifecycle
            .run(
                generator,
                self.timeout,
                &self.user.id,
                prompt,
                orientation,
                size,
                balance,
            )
            .await?;

        let remaining = ledger::debit(balance, size)?;
        self.user.credits = remaining;
        self.catalog.add(image);
        log::info!(
            "Charged {} credits for {} image, {} remaining",
            ledger::cost_of(size),
            size,
            remaining
        );

        self.catalog
            .latest()
            .ok_or_else(|| ImaginaError::Internal("catalog empty after insert".into()))
    }

    /// Resubmits the prompt, orientation and size of an existing image as a new, paid generation.
    pub async fn regenerate(
        &mut self,
        generator: &dyn ImageGenerator,
        image_id: &str,
    ) -> Result<&GeneratedImage> {
        let source = self
            .catalog
            .get(image_id)
            .ok_or_else(|| ImaginaError::UnknownImage(image_id.to_string()))?;
        let (prompt, orientation, size) = (source.prompt.clone(), source.orientation, source.size);

        log::info!("Regenerating image {}", image_id);
        self.generate(generator, &prompt, orientation, size).await
    }

    /// Simulated checkout: always succeeds for a known package.
    pub fn purchase(&mut self, package_id: &str) -> Result<&Payment> {
        let package = find_package(package_id)
            .ok_or_else(|| ImaginaError::UnknownPackage(package_id.to_string()))?;

        self.user.credits = ledger::credit(self.user.credits, package.credits);
        let payment = Payment::simulated(self.user.id.clone(), package);
        log::info!(
            "Simulated purchase of {}: +{} credits ({})",
            package.name,
            package.credits,
            payment.charge_id
        );
        self.payments.push(payment);
        self.navigate(View::Generator);

        self.payments
            .last()
            .ok_or_else(|| ImaginaError::Internal("payment not recorded".into()))
    }

    pub fn search(&mut self, term: impl Into<String>) {
        self.library.set_search(term);
    }

    pub fn go_to_page(&mut self, page: usize) -> Result<()> {
        self.library.go_to_page(&self.catalog, page)
    }

    pub fn next_page(&mut self) -> bool {
        self.library.next_page(&self.catalog)
    }

    pub fn previous_page(&mut self) -> bool {
        self.library.previous_page(&self.catalog)
    }

    pub fn library_page(&self) -> LibraryPage<'_> {
        self.library.page(&self.catalog)
    }

    pub fn promote_to_admin(&mut self) {
        self.user.role = Role::Admin;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::test_support::ScriptedGenerator;
    use crate::lifecycle::{GENERATION_FAILED_MESSAGE, INSUFFICIENT_CREDITS_MESSAGE};

    fn state_with(credits: u32) -> AppState {
        AppState::new(User::new("1", "user@example.com", credits))
    }

    #[tokio::test]
    async fn test_successful_generation() {
        let generator = ScriptedGenerator::succeeding();
        let mut state = state_with(25);

        let image = state
            .generate(&generator, "a castle", Orientation::Portrait, ImageSize::TwoK)
            .await
            .unwrap()
            .clone();
        assert_eq!(image.prompt, "a castle");
        assert_eq!(state.credits(), 22);
        assert_eq!(state.catalog().len(), 1);
        assert_eq!(state.catalog().latest(), Some(&image));
        assert!(!state.is_generating());
        assert!(state.lifecycle().error().is_none());
    }

    #[tokio::test]
    async fn test_failed_generation_changes_nothing() {
        let generator = ScriptedGenerator::succeeding();
        let mut state = state_with(10);
        state
            .generate(&generator, "first", Orientation::Square, ImageSize::Hd)
            .await
            .unwrap();
        let before_ids: Vec<String> = state.catalog().images().iter().map(|i| i.id.clone()).collect();

        let broken = ScriptedGenerator::failing("connection reset");
        let err = state
            .generate(&broken, "second", Orientation::Square, ImageSize::FourK)
            .await
            .unwrap_err();

        assert!(matches!(err, ImaginaError::GenerationFailure(_)));
        assert_eq!(state.credits(), 9);
        let after_ids: Vec<String> = state.catalog().images().iter().map(|i| i.id.clone()).collect();
        assert_eq!(before_ids, after_ids);
        assert!(!state.is_generating());
        assert_eq!(state.lifecycle().error(), Some(GENERATION_FAILED_MESSAGE));
    }

    #[tokio::test]
    async fn test_unaffordable_request_is_rejected_before_calling_out() {
        let generator = ScriptedGenerator::succeeding();
        let mut state = state_with(2);

        let err = state
            .generate(&generator, "a castle", Orientation::Square, ImageSize::TwoK)
            .await
            .unwrap_err();
        assert!(matches!(err, ImaginaError::InsufficientCredits { .. }));
        assert_eq!(generator.calls(), 0);
        assert_eq!(state.credits(), 2);
        assert!(state.catalog().is_empty());
        assert_eq!(state.lifecycle().error(), Some(INSUFFICIENT_CREDITS_MESSAGE));
    }

    #[tokio::test]
    async fn test_timeout_is_a_generation_failure() {
        let generator = ScriptedGenerator::hanging(Duration::from_secs(30));
        let mut state = state_with(5).with_timeout(Duration::from_millis(20));

        let err = state
            .generate(&generator, "slow", Orientation::Square, ImageSize::Hd)
            .await
            .unwrap_err();
        assert!(err.is_generation_failure());
        assert_eq!(state.credits(), 5);
        assert!(state.catalog().is_empty());
        assert!(!state.is_generating());
    }

    #[tokio::test]
    async fn test_cancelled_generation_does_not_block_the_next() {
        let hanging = ScriptedGenerator::hanging(Duration::from_secs(30));
        let mut state = state_with(5);

        let cancelled = tokio::time::timeout(
            Duration::from_millis(20),
            state.generate(&hanging, "slow", Orientation::Square, ImageSize::Hd),
        )
        .await;
        assert!(cancelled.is_err());
        assert!(!state.is_generating());
        assert_eq!(state.credits(), 5);
        assert!(state.catalog().is_empty());
        assert_eq!(state.lifecycle().error(), Some(GENERATION_FAILED_MESSAGE));

        let generator = ScriptedGenerator::succeeding();
        let image = state
            .generate(&generator, "fast", Orientation::Square, ImageSize::Hd)
            .await
            .unwrap()
            .clone();
        assert_eq!(image.prompt, "fast");
        assert_eq!(state.credits(), 4);
        assert!(state.lifecycle().error().is_none());
    }

    #[tokio::test]
    async fn test_regenerate_resubmits_and_charges() {
        let generator = ScriptedGenerator::succeeding();
        let mut state = state_with(10);
        let original_id = state
            .generate(&generator, "a castle", Orientation::Landscape, ImageSize::TwoK)
            .await
            .unwrap()
            .id
            .clone();

        let copy = state.regenerate(&generator, &original_id).await.unwrap().clone();
        assert_ne!(copy.id, original_id);
        assert_eq!(copy.prompt, "a castle");
        assert_eq!(copy.orientation, Orientation::Landscape);
        assert_eq!(copy.size, ImageSize::TwoK);
        assert_eq!(state.credits(), 4);
        assert_eq!(state.catalog().len(), 2);

        assert!(matches!(
            state.regenerate(&generator, "nope").await,
            Err(ImaginaError::UnknownImage(_))
        ));
    }

    #[test]
    fn test_purchase_credits_and_navigates() {
        let mut state = state_with(7);
        state.navigate(View::Pricing);

        let payment = state.purchase("creator").unwrap().clone();
        assert_eq!(payment.credits_added, 250);
        assert_eq!(state.credits(), 257);
        assert_eq!(state.current_view(), View::Generator);
        assert_eq!(state.payments().len(), 1);

        assert!(matches!(
            state.purchase("platinum"),
            Err(ImaginaError::UnknownPackage(_))
        ));
        assert_eq!(state.credits(), 257);
    }

    #[test]
    fn test_admin_view_is_unreachable_for_users() {
        let mut state = state_with(1);
        assert_eq!(state.navigate(View::Admin), View::Generator);
        state.promote_to_admin();
        assert_eq!(state.navigate(View::Admin), View::Admin);
    }

    #[tokio::test]
    async fn test_search_resets_library_page() {
        let generator = ScriptedGenerator::succeeding();
        let config = Config::new().with_starting_credits(30).with_page_size(2);
        let mut state = AppState::from_config(&config);
        for prompt in ["red fox", "blue bird", "red barn", "green field", "red sky"] {
            state
                .generate(&generator, prompt, Orientation::Square, ImageSize::Hd)
                .await
                .unwrap();
        }

        state.go_to_page(3).unwrap();
        assert_eq!(state.library_page().images.len(), 1);

        state.search("red");
        assert_eq!(state.library().current_page(), 1);
        let page = state.library_page();
        assert_eq!(page.total_matches, 3);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.images[0].prompt, "red sky");
    }
}
