use crate::{
    client::{
        image_prep::{convert_for_upload, make_preview, ConvertedImage, Preview, WEB_QUALITY},
        ClientError,
    },
    entities::saree::Category,
};

pub const MISSING_FIELDS: &str = "Please fill out all fields";
pub const UPLOAD_FAILED: &str = "Error uploading the file. Please try again.";
pub const CONVERSION_FAILED: &str = "Error converting image. Please try another file.";

/// A converted image together with the preview rendered from it.
///
/// Holding both in one value keeps the pair consistent: a slot either has a
/// converted blob with its preview, or nothing at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSlot {
    pub source_name: String,
    pub converted: ConvertedImage,
    pub preview: Preview,
}

impl ImageSlot {
    pub fn from_file(source_name: &str, bytes: &[u8]) -> Result<Self, ClientError> {
        let converted = convert_for_upload(source_name, bytes, WEB_QUALITY)?;
        let preview = make_preview(&converted)?;

        Ok(ImageSlot {
            source_name: source_name.to_string(),
            converted,
            preview,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrimarySlot {
    pub is_dragging: bool,
    pub image: Option<ImageSlot>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecondarySlots {
    pub is_dragging: bool,
    pub images: Vec<ImageSlot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotTarget {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStatus {
    Idle,
    Uploading { progress: u8 },
    Succeeded,
    Failed,
}

#[derive(Debug, Clone)]
pub enum UploadFormEvent {
    NameChanged(String),
    DescriptionChanged(String),
    CategoryChanged(Option<Category>),
    DragEntered(SlotTarget),
    DragLeft(SlotTarget),
    PrimaryImageReady(ImageSlot),
    SecondaryImageReady(ImageSlot),
    ImageConversionFailed(SlotTarget),
    SecondaryRemoved(usize),
    PrimaryCleared,
    SubmitStarted,
    UploadProgress(u8),
    SubmitSucceeded,
    SubmitFailed(Option<String>),
    SuccessDismissed,
}

/// What gets sent to `POST /api/sarees/upload`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSubmission {
    pub name: String,
    pub description: String,
    pub category: Category,
    pub image: ConvertedImage,
    pub thumbnail_images: Vec<ConvertedImage>,
}

/// State of the admin upload form. Every change goes through [`UploadFormState::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFormState {
    pub name: String,
    pub description: String,
    pub category: Option<Category>,
    pub primary: PrimarySlot,
    pub secondary: SecondarySlots,
    pub status: SubmitStatus,
    pub error: Option<String>,
    max_secondary_images: usize,
}

impl UploadFormState {
    pub fn new(max_secondary_images: usize) -> Self {
        UploadFormState {
            name: String::new(),
            description: String::new(),
            category: None,
            primary: PrimarySlot::default(),
            secondary: SecondarySlots::default(),
            status: SubmitStatus::Idle,
            error: None,
            max_secondary_images,
        }
    }

    pub fn max_secondary_images(&self) -> usize {
        self.max_secondary_images
    }

    pub fn remaining_secondary_slots(&self) -> usize {
        self.max_secondary_images.saturating_sub(self.secondary.images.len())
    }

    pub fn is_uploading(&self) -> bool {
        matches!(self.status, SubmitStatus::Uploading { .. })
    }

    pub fn apply(&mut self, event: UploadFormEvent) -> Result<(), ClientError> {
        match event {
            UploadFormEvent::NameChanged(name) => self.name = name,
            UploadFormEvent::DescriptionChanged(description) => self.description = description,
            UploadFormEvent::CategoryChanged(category) => self.category = category,

            UploadFormEvent::DragEntered(target) => self.set_dragging(target, true),
            UploadFormEvent::DragLeft(target) => self.set_dragging(target, false),

            UploadFormEvent::PrimaryImageReady(slot) => {
                self.primary = PrimarySlot { is_dragging: false, image: Some(slot) };
                self.error = None;
            }
            UploadFormEvent::SecondaryImageReady(slot) => {
                self.secondary.is_dragging = false;
                if self.remaining_secondary_slots() == 0 {
                    return Err(ClientError::Form(format!(
                        "You can add at most {} additional images",
                        self.max_secondary_images
                    )));
                }
                self.secondary.images.push(slot);
                self.error = None;
            }
            UploadFormEvent::ImageConversionFailed(target) => {
                self.set_dragging(target, false);
                self.error = Some(CONVERSION_FAILED.to_string());
            }
            UploadFormEvent::SecondaryRemoved(index) => {
                if index >= self.secondary.images.len() {
                    return Err(ClientError::Form(format!("No additional image at position {}", index)));
                }
                self.secondary.images.remove(index);
            }
            UploadFormEvent::PrimaryCleared => self.primary.image = None,

            UploadFormEvent::SubmitStarted => {
                if self.is_uploading() {
                    return Err(ClientError::Form("An upload is already in progress".to_string()));
                }
                if let Err(e) = self.submission() {
                    self.error = Some(e.to_string());
                    return Err(e);
                }
                self.error = None;
                self.status = SubmitStatus::Uploading { progress: 0 };
            }
            UploadFormEvent::UploadProgress(progress) => {
                if let SubmitStatus::Uploading { progress: current } = self.status {
                    self.status = SubmitStatus::Uploading { progress: progress.min(100).max(current) };
                }
            }
            UploadFormEvent::SubmitSucceeded => {
                *self = UploadFormState::new(self.max_secondary_images);
                self.status = SubmitStatus::Succeeded;
            }
            UploadFormEvent::SubmitFailed(message) => {
                self.status = SubmitStatus::Failed;
                self.error = Some(
                    message
                        .filter(|m| !m.trim().is_empty())
                        .unwrap_or_else(|| UPLOAD_FAILED.to_string()),
                );
            }
            UploadFormEvent::SuccessDismissed => {
                if self.status == SubmitStatus::Succeeded {
                    self.status = SubmitStatus::Idle;
                }
            }
        }
        Ok(())
    }

    /// Converts a picked or dropped file and feeds the outcome back through `apply`.
    pub fn load_file(&mut self, target: SlotTarget, file_name: &str, bytes: &[u8]) -> Result<(), ClientError> {
        match ImageSlot::from_file(file_name, bytes) {
            Ok(slot) => match target {
                SlotTarget::Primary => self.apply(UploadFormEvent::PrimaryImageReady(slot)),
                SlotTarget::Secondary => self.apply(UploadFormEvent::SecondaryImageReady(slot)),
            },
            Err(e) => {
                tracing::warn!("Image conversion failed for {}: {}", file_name, e);
                self.apply(UploadFormEvent::ImageConversionFailed(target))?;
                Err(e)
            }
        }
    }

    pub fn submission(&self) -> Result<UploadSubmission, ClientError> {
        let missing = || ClientError::Form(MISSING_FIELDS.to_string());

        if self.name.trim().is_empty() || self.description.trim().is_empty() {
            return Err(missing());
        }
        let category = self.category.ok_or_else(missing)?;
        let primary = self.primary.image.as_ref().ok_or_else(missing)?;

        Ok(UploadSubmission {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            category,
            image: primary.converted.clone(),
            thumbnail_images: self.secondary.images.iter().map(|s| s.converted.clone()).collect(),
        })
    }

    fn set_dragging(&mut self, target: SlotTarget, dragging: bool) {
        match target {
            SlotTarget::Primary => self.primary.is_dragging = dragging,
            SlotTarget::Secondary => self.secondary.is_dragging = dragging,
        }
    }
}
