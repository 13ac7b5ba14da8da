//! Email policy and branding configuration

use std::path::PathBuf;

use clap::Parser;

use crate::domain::communication::emails::{LogoUrls, TemplateConfig, Urls, ValidationConfig};

/// Which requests the gateway accepts
#[derive(Clone, Debug, PartialEq, Eq, Parser)]
pub struct EmailPolicyConfig {
    /// Domains senders may use, comma separated
    #[clap(
        long,
        env = "ALLOWED_SENDER_DOMAINS",
        value_delimiter = ',',
        required = true
    )]
    pub allowed_sender_domains: Vec<String>,

    /// Attachment extensions to refuse, comma separated and case-sensitive
    #[clap(
        long,
        env = "UNSUPPORTED_ATTACHMENT_EXTENSIONS",
        value_delimiter = ',',
        default_value = "exe,bat,cmd,com,msi,scr,vbs,js"
    )]
    pub unsupported_attachment_extensions: Vec<String>,

    /// Maximum combined size of all attachments of one email
    #[clap(
        long,
        env = "PERMISSIBLE_ATTACHMENT_SIZE_IN_BYTES",
        default_value = "9437184"
    )]
    pub permissible_attachment_size_in_bytes: usize,
}

impl From<EmailPolicyConfig> for ValidationConfig {
    fn from(config: EmailPolicyConfig) -> Self {
        Self {
            allowed_sender_domains: trimmed(config.allowed_sender_domains),
            unsupported_attachment_extensions: trimmed(config.unsupported_attachment_extensions),
            permissible_attachment_size: config.permissible_attachment_size_in_bytes,
        }
    }
}

/// Base template location and the URLs it is rendered with
#[derive(Clone, Debug, PartialEq, Eq, Parser)]
pub struct BrandingConfig {
    /// Path of the base HTML template
    #[clap(
        long,
        env = "BASE_TEMPLATE_FILE_PATH",
        default_value = "templates/emails/base.html"
    )]
    pub base_template_file_path: PathBuf,

    /// Brand logo URL
    #[clap(long, env = "LOGO_URL_BRAND", default_value = "")]
    pub logo_url_brand: String,

    /// Facebook icon URL
    #[clap(long, env = "LOGO_URL_FACEBOOK", default_value = "")]
    pub logo_url_facebook: String,

    /// Instagram icon URL
    #[clap(long, env = "LOGO_URL_INSTAGRAM", default_value = "")]
    pub logo_url_instagram: String,

    /// Twitter icon URL
    #[clap(long, env = "LOGO_URL_TWITTER", default_value = "")]
    pub logo_url_twitter: String,

    /// LinkedIn icon URL
    #[clap(long, env = "LOGO_URL_LINKEDIN", default_value = "")]
    pub logo_url_linkedin: String,

    /// App Store badge URL
    #[clap(long, env = "LOGO_URL_DOWNLOAD_IOS", default_value = "")]
    pub logo_url_download_ios: String,

    /// Google Play badge URL
    #[clap(long, env = "LOGO_URL_DOWNLOAD_ANDROID", default_value = "")]
    pub logo_url_download_android: String,

    /// Help center URL
    #[clap(long, env = "HELP_CENTER_URL", default_value = "")]
    pub help_center_url: String,

    /// Privacy policy URL
    #[clap(long, env = "PRIVACY_POLICY_URL", default_value = "")]
    pub privacy_policy_url: String,

    /// Unsubscribe URL
    #[clap(long, env = "UNSUBSCRIBE_URL", default_value = "")]
    pub unsubscribe_url: String,

    /// FAQ URL
    #[clap(long, env = "FAQ_URL", default_value = "")]
    pub faq_url: String,
}

impl From<BrandingConfig> for TemplateConfig {
    fn from(config: BrandingConfig) -> Self {
        Self {
            base_template_path: config.base_template_file_path,
            logo_urls: LogoUrls {
                brand: config.logo_url_brand,
                facebook: config.logo_url_facebook,
                instagram: config.logo_url_instagram,
                twitter: config.logo_url_twitter,
                linkedin: config.logo_url_linkedin,
                download_ios: config.logo_url_download_ios,
                download_android: config.logo_url_download_android,
            },
            urls: Urls {
                help_center: config.help_center_url,
                privacy_policy: config.privacy_policy_url,
                unsubscribe: config.unsubscribe_url,
                faq: config.faq_url,
            },
        }
    }
}

fn trimmed(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect()
}
