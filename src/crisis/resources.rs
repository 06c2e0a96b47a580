// Crisis resources directory
//
// Structured list of official support services, shown by the `resources`
// command and whenever emergency contacts are surfaced.

use crate::classify::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    Phone,
    WhatsApp,
    Website,
}

#[derive(Debug, Clone, Copy)]
pub struct Contact {
    pub kind: ContactKind,
    pub label: &'static str,
    pub value: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct CrisisResource {
    pub name: &'static str,
    pub description_id: &'static str,
    pub description_en: &'static str,
    pub contacts: &'static [Contact],
}

impl CrisisResource {
    pub fn description(&self, language: Language) -> &'static str {
        match language {
            Language::Indonesian => self.description_id,
            Language::English => self.description_en,
        }
    }
}

pub const RESOURCES: &[CrisisResource] = &[
    CrisisResource {
        name: "SEJIWA – Kemenkes RI",
        description_id: "Layanan psikososial nasional untuk masyarakat Indonesia. Gratis dan tersedia 24 jam.",
        description_en: "National psychosocial support service for Indonesia. Free and available 24 hours.",
        contacts: &[
            Contact { kind: ContactKind::Phone, label: "Hubungi 119 ext. 8", value: "119" },
            Contact { kind: ContactKind::WhatsApp, label: "WhatsApp SEJIWA", value: "https://wa.me/6282125711232" },
            Contact { kind: ContactKind::Website, label: "sejiwa.kemkes.go.id", value: "https://sejiwa.kemkes.go.id" },
        ],
    },
    CrisisResource {
        name: "LSM Jangan Bunuh Diri",
        description_id: "Layanan pendampingan untuk pencegahan bunuh diri.",
        description_en: "Suicide prevention support line.",
        contacts: &[Contact { kind: ContactKind::Phone, label: "021-9696-9293", value: "02196969293" }],
    },
    CrisisResource {
        name: "Yayasan Pulih",
        description_id: "Layanan pemulihan trauma dan dukungan psikologis.",
        description_en: "Trauma recovery and psychological support.",
        contacts: &[Contact { kind: ContactKind::Phone, label: "021-788-42580", value: "02178842580" }],
    },
    CrisisResource {
        name: "Into The Light Indonesia",
        description_id: "Komunitas nirlaba untuk pencegahan bunuh diri dan edukasi kesehatan mental remaja.",
        description_en: "Non-profit community for suicide prevention and youth mental health education.",
        contacts: &[Contact { kind: ContactKind::Website, label: "intothelightid.org", value: "https://intothelightid.org" }],
    },
    CrisisResource {
        name: "Emergency",
        description_id: "Nomor darurat nasional.",
        description_en: "National emergency number.",
        contacts: &[Contact { kind: ContactKind::Phone, label: "112", value: "112" }],
    },
];

/// Ways to reach professional help beyond hotlines
pub fn professional_help_paths(language: Language) -> &'static [&'static str] {
    match language {
        Language::Indonesian => &[
            "Puskesmas: konsultasi awal dan rujukan ke psikiater atau psikolog.",
            "Rumah sakit pemerintah: banyak layanan kesehatan jiwa ditanggung BPJS.",
            "Layanan konseling kampus/sekolah: gratis bagi pelajar dan mahasiswa.",
        ],
        Language::English => &[
            "Community health centres (Puskesmas): first consultation and referral to a psychiatrist or psychologist.",
            "Public hospitals: many mental health services are covered by BPJS.",
            "Campus or school counselling: free for students.",
        ],
    }
}

/// Phone numbers only, for the compact emergency-contacts banner
pub fn emergency_numbers() -> Vec<(&'static str, &'static str)> {
    RESOURCES
        .iter()
        .flat_map(|r| {
            r.contacts
                .iter()
                .filter(|c| c.kind == ContactKind::Phone)
                .map(move |c| (r.name, c.label))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emergency_numbers_are_phones() {
        let numbers = emergency_numbers();
        assert!(numbers.iter().any(|(_, label)| label.contains("119")));
        assert!(numbers.iter().any(|(_, label)| *label == "112"));
        assert!(!numbers.iter().any(|(_, label)| label.contains("intothelightid")));
    }
}
