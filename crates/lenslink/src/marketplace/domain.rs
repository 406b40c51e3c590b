use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Opaque identifier assigned to every stored record, independent of backend row ids.
pub fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}

/// Account roles recognized by the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Photographer,
    Admin,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Photographer => "photographer",
            Role::Admin => "admin",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "user" => Some(Role::User),
            "photographer" => Some(Role::Photographer),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// Stored account. Never serialized directly so the credential cannot leak.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub password_hash: String,
    pub restriction: Option<Restriction>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_restricted(&self) -> bool {
        self.restriction.is_some()
    }

    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id.clone(),
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            role: self.role,
            restricted: self.is_restricted(),
            restriction_reason: self.restriction.as_ref().map(|r| r.reason.clone()),
            restricted_at: self.restriction.as_ref().map(|r| r.restricted_at),
            created_at: self.created_at,
        }
    }

    pub fn identity(&self) -> UserIdentity {
        UserIdentity {
            id: self.id.clone(),
            full_name: self.full_name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Admin-imposed restriction on an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restriction {
    pub reason: String,
    pub restricted_at: DateTime<Utc>,
}

/// Account projection with credentials removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub restricted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restriction_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restricted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Minimal reviewer/reporter identity attached to reviews and reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: String,
    pub full_name: String,
    pub email: String,
}

/// Registration payload. The credential arrives already hashed by the auth layer.
#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    pub email: String,
    pub full_name: String,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub password_hash: String,
}

fn default_role() -> String {
    Role::User.label().to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotographerProfile {
    pub id: String,
    pub user_id: String,
    pub bio: String,
    pub specialties: Vec<String>,
    pub experience_years: u32,
    pub phone: String,
    pub location: String,
    pub profile_image: Option<String>,
    pub cover_image: Option<String>,
    pub approval_status: ApprovalStatus,
    pub average_rating: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileDraft {
    pub bio: String,
    pub specialties: Vec<String>,
    pub experience_years: u32,
    pub phone: String,
    pub location: String,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
}

/// Partial-update slot: an absent field keeps the stored value, a present one replaces it.
///
/// Optional targets use `FieldUpdate<Option<T>>`, so an explicit `null` clears the value and an
/// explicit empty list clears a collection.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate<T> {
    Keep,
    Set(T),
}

impl<T> Default for FieldUpdate<T> {
    fn default() -> Self {
        FieldUpdate::Keep
    }
}

impl<T> FieldUpdate<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, FieldUpdate::Keep)
    }

    pub fn apply(self, target: &mut T) {
        if let FieldUpdate::Set(value) = self {
            *target = value;
        }
    }
}

impl<'de, T> Deserialize<'de> for FieldUpdate<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize(deserializer).map(FieldUpdate::Set)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfilePatch {
    #[serde(default)]
    pub bio: FieldUpdate<String>,
    #[serde(default)]
    pub specialties: FieldUpdate<Vec<String>>,
    #[serde(default)]
    pub experience_years: FieldUpdate<u32>,
    #[serde(default)]
    pub phone: FieldUpdate<String>,
    #[serde(default)]
    pub location: FieldUpdate<String>,
    #[serde(default)]
    pub profile_image: FieldUpdate<Option<String>>,
    #[serde(default)]
    pub cover_image: FieldUpdate<Option<String>>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.bio.is_keep()
            && self.specialties.is_keep()
            && self.experience_years.is_keep()
            && self.phone.is_keep()
            && self.location.is_keep()
            && self.profile_image.is_keep()
            && self.cover_image.is_keep()
    }

    pub fn apply(self, profile: &mut PhotographerProfile) {
        self.bio.apply(&mut profile.bio);
        self.specialties.apply(&mut profile.specialties);
        self.experience_years.apply(&mut profile.experience_years);
        self.phone.apply(&mut profile.phone);
        self.location.apply(&mut profile.location);
        self.profile_image.apply(&mut profile.profile_image);
        self.cover_image.apply(&mut profile.cover_image);
    }
}

/// Free-form biography block shown next to a photographer profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AboutMe {
    pub id: String,
    pub user_id: String,
    pub country: Option<String>,
    pub languages: Vec<String>,
    pub about: Option<String>,
    pub social_links: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AboutMeDraft {
    pub user_id: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub about: Option<String>,
    #[serde(default)]
    pub social_links: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AboutMePatch {
    #[serde(default)]
    pub country: FieldUpdate<Option<String>>,
    #[serde(default)]
    pub languages: FieldUpdate<Vec<String>>,
    #[serde(default)]
    pub about: FieldUpdate<Option<String>>,
    #[serde(default)]
    pub social_links: FieldUpdate<Vec<String>>,
}

impl AboutMePatch {
    pub fn is_empty(&self) -> bool {
        self.country.is_keep()
            && self.languages.is_keep()
            && self.about.is_keep()
            && self.social_links.is_keep()
    }

    pub fn apply(self, about: &mut AboutMe) {
        self.country.apply(&mut about.country);
        self.languages.apply(&mut about.languages);
        self.about.apply(&mut about.about);
        self.social_links.apply(&mut about.social_links);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioItem {
    pub id: String,
    pub photographer_id: String,
    pub category: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PortfolioDraft {
    pub category: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageKind {
    Predefined,
    #[default]
    Custom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub id: String,
    pub photographer_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PackageKind,
    pub category: String,
    pub description: String,
    pub price: f64,
    pub duration: String,
    pub deliverables: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PackageDraft {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: PackageKind,
    pub category: String,
    pub description: String,
    pub price: f64,
    pub duration: String,
    pub deliverables: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl BookingStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "pending" => Some(BookingStatus::Pending),
            "approved" => Some(BookingStatus::Approved),
            "rejected" => Some(BookingStatus::Rejected),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub user_id: String,
    pub photographer_id: String,
    pub package_id: String,
    pub booking_date: String,
    pub booking_time: String,
    pub location: String,
    pub message: String,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookingDraft {
    pub photographer_id: String,
    pub package_id: String,
    pub booking_date: String,
    pub booking_time: String,
    pub location: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub photographer_id: String,
    pub user_id: String,
    pub rating: u8,
    pub review_text: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewSubmission {
    pub photographer_id: String,
    pub user_id: String,
    pub rating: u8,
    #[serde(default)]
    pub review_text: Option<String>,
}

/// Fixed set of reasons a photographer can be reported for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportReason {
    HateSpeech,
    Nudity,
    SpamOrScam,
    FakeProfile,
    AbusiveLanguage,
    CopyrightViolation,
    Harassment,
    ViolenceOrThreats,
    Discrimination,
    MisleadingInformation,
    InappropriateBehavior,
    IllegalContent,
    SelfHarm,
    AnimalCruelty,
    Other,
}

impl ReportReason {
    pub const ALL: [ReportReason; 15] = [
        ReportReason::HateSpeech,
        ReportReason::Nudity,
        ReportReason::SpamOrScam,
        ReportReason::FakeProfile,
        ReportReason::AbusiveLanguage,
        ReportReason::CopyrightViolation,
        ReportReason::Harassment,
        ReportReason::ViolenceOrThreats,
        ReportReason::Discrimination,
        ReportReason::MisleadingInformation,
        ReportReason::InappropriateBehavior,
        ReportReason::IllegalContent,
        ReportReason::SelfHarm,
        ReportReason::AnimalCruelty,
        ReportReason::Other,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ReportReason::HateSpeech => "Hate Speech",
            ReportReason::Nudity => "Nudity or Pornographic Content",
            ReportReason::SpamOrScam => "Spam or Scam",
            ReportReason::FakeProfile => "Fake Profile",
            ReportReason::AbusiveLanguage => "Abusive Language",
            ReportReason::CopyrightViolation => "Copyright Violation",
            ReportReason::Harassment => "Harassment or Bullying",
            ReportReason::ViolenceOrThreats => "Violence or Threats",
            ReportReason::Discrimination => "Discrimination",
            ReportReason::MisleadingInformation => "Misleading Information",
            ReportReason::InappropriateBehavior => "Inappropriate Behavior",
            ReportReason::IllegalContent => "Illegal Content",
            ReportReason::SelfHarm => "Self-harm or Suicide Content",
            ReportReason::AnimalCruelty => "Animal Cruelty",
            ReportReason::Other => "Other",
        }
    }

    /// Exact match against the published labels.
    pub fn from_label(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|reason| reason.label() == raw)
    }

    pub fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|reason| reason.label()).collect()
    }
}

impl Serialize for ReportReason {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for ReportReason {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        ReportReason::from_label(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown report reason '{raw}'")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    Reviewed,
}

/// Verdict an admin applies to a pending report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationAction {
    Restrict,
    Delete,
    Dismiss,
}

impl ModerationAction {
    pub const ALL: [ModerationAction; 3] = [
        ModerationAction::Restrict,
        ModerationAction::Delete,
        ModerationAction::Dismiss,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ModerationAction::Restrict => "restrict",
            ModerationAction::Delete => "delete",
            ModerationAction::Dismiss => "dismiss",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.label() == raw)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    pub reporter_id: String,
    pub photographer_id: String,
    pub reason: ReportReason,
    pub description: Option<String>,
    pub status: ReportStatus,
    pub admin_action: Option<ModerationAction>,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Review metadata written onto a report when it leaves the pending state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportReview {
    pub action: ModerationAction,
    pub reviewed_by: String,
    pub reviewed_at: DateTime<Utc>,
}

/// Inbound report payload. `user_id` is the reporter.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportSubmission {
    #[serde(alias = "reporter_id")]
    pub user_id: String,
    pub photographer_id: String,
    pub reason: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Immutable record of a moderation outcome addressed to both parties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub report_id: String,
    pub photographer_id: String,
    pub reporter_id: String,
    pub admin_action: ModerationAction,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}
