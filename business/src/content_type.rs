use std::fmt;

/// The semantic category of a QR payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ContentType {
    #[default]
    Url,
    Email,
    Phone,
    Wifi,
    Location,
    Event,
    Text,
}

impl ContentType {
    /// Every type, in the order shown in the type picker.
    pub const ALL: [ContentType; 7] = [
        ContentType::Url,
        ContentType::Email,
        ContentType::Phone,
        ContentType::Wifi,
        ContentType::Location,
        ContentType::Event,
        ContentType::Text,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ContentType::Url => "url",
            ContentType::Email => "email",
            ContentType::Phone => "phone",
            ContentType::Wifi => "wifi",
            ContentType::Location => "location",
            ContentType::Event => "event",
            ContentType::Text => "text",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ContentType::Url => "URL",
            ContentType::Email => "Email",
            ContentType::Phone => "Phone",
            ContentType::Wifi => "Wi-Fi",
            ContentType::Location => "Location",
            ContentType::Event => "Event",
            ContentType::Text => "Text",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            ContentType::Url => "🔗",
            ContentType::Email => "✉",
            ContentType::Phone => "☎",
            ContentType::Wifi => "📶",
            ContentType::Location => "📍",
            ContentType::Event => "📅",
            ContentType::Text => "✔",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            ContentType::Url => "https://example.com",
            ContentType::Email => "email@example.com",
            ContentType::Phone => "+1234567890",
            ContentType::Wifi => "SSID, Password",
            ContentType::Location => "Latitude, Longitude",
            ContentType::Event => "Event details",
            ContentType::Text => "Enter any text",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
