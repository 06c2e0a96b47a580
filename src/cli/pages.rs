// Static screens: welcome banner, crisis resources, privacy notice

use std::fmt::Write;

use crate::classify::Language;
use crate::crisis::resources::{professional_help_paths, ContactKind, RESOURCES};

/// Conversation starters shown on an empty conversation
pub const SUGGESTED_PROMPTS: &[&str] = &[
    "Aku merasa gelisah dengan study ku",
    "Aku sedang bertengkar dengan teman ku",
    "Aku memiliki masalah dengan tidur malam ku",
    "Aku merasa kewalahan dengan setiap pekerjaan ku",
    "Aku khawatir dengan masa depan ku",
    "Aku merasa kesepian dan terisolasi",
];

pub fn welcome_banner(narration: bool) -> String {
    let mut out = String::from(
        "Welcome to Otravoce AI\n\n\
         Aku siap mendengarkan dan menemanimu melewati apa pun yang sedang kamu rasakan.\n\
         Percakapan ini bersifat rahasia dan tanpa penghakiman.\n\n\
         Yuk, mulai percakapan dengan mengetik pesan, atau coba salah satu:\n",
    );
    for prompt in SUGGESTED_PROMPTS {
        let _ = writeln!(out, "  • {prompt}");
    }
    if narration {
        out.push_str(
            "\nSuara aktif: respons AI akan dibacakan. Ketik /tts off untuk menonaktifkannya.\n",
        );
    }
    out.push_str("\nKetik /help untuk daftar perintah.");
    out
}

pub fn resources_page(language: Language) -> String {
    let mut out = match language {
        Language::Indonesian => String::from(
            "Sumber Bantuan Krisis\n\n\
             Jika kamu atau seseorang yang kamu kenal berada dalam bahaya, segera hubungi layanan di bawah ini.\n\n",
        ),
        Language::English => String::from(
            "Crisis Resources\n\n\
             If you or someone you know is in danger, contact one of these services right away.\n\n",
        ),
    };

    for resource in RESOURCES {
        let _ = writeln!(out, "{}", resource.name);
        let _ = writeln!(out, "  {}", resource.description(language));
        for contact in resource.contacts {
            let kind = match contact.kind {
                ContactKind::Phone => "Tel",
                ContactKind::WhatsApp => "WhatsApp",
                ContactKind::Website => "Web",
            };
            if contact.kind == ContactKind::Phone {
                let _ = writeln!(out, "  {kind}: {}", contact.label);
            } else {
                let _ = writeln!(out, "  {kind}: {}", contact.value);
            }
        }
        out.push('\n');
    }

    out.push_str(match language {
        Language::Indonesian => "Bantuan profesional lainnya:\n",
        Language::English => "Other professional help:\n",
    });
    for path in professional_help_paths(language) {
        let _ = writeln!(out, "  • {path}");
    }

    out.trim_end().to_string()
}

pub fn privacy_page() -> String {
    r#"Your Privacy Matters

Di OtravoceAI, kami sangat menjaga privasi kamu dan berusaha agar kamu selalu
merasa aman saat menggunakan layanan kami.

Informasi yang disimpan
  • Percakapan chat disimpan di perangkat ini (folder data, default ~/.otravoce)
  • Setiap pesan yang kamu kirim juga disalin ke basis data jarak jauh bila
    [mirror] dikonfigurasi
  • Pesanmu dikirim ke penyedia model AI untuk menghasilkan jawaban
  • Log hanya memuat ringkasan hash dari pesanmu, bukan isinya

Batasan penting
  • OtravoceAI bukan pengganti psikolog atau profesional kesehatan mental
  • AI kami tidak bisa memberikan diagnosis kondisi mental
  • Jika kamu mengalami situasi krisis, segera hubungi layanan darurat atau
    hotline krisis (ketik /resources)
  • Kalau masalah kesehatan mentalmu berlanjut, konsultasikan dengan tenaga
    profesional

Hak kamu
  • Menghapus seluruh percakapan kapan saja dengan /clear
  • Menggunakan layanan tanpa akun
  • Mengetahui bagaimana datamu digunakan"#
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_lists_prompts() {
        let banner = welcome_banner(false);
        for prompt in SUGGESTED_PROMPTS {
            assert!(banner.contains(prompt));
        }
        assert!(!banner.contains("/tts off"));
        assert!(welcome_banner(true).contains("/tts off"));
    }

    #[test]
    fn test_resources_page_has_every_service() {
        for language in [Language::Indonesian, Language::English] {
            let page = resources_page(language);
            for resource in RESOURCES {
                assert!(page.contains(resource.name));
            }
        }
        assert!(resources_page(Language::Indonesian).contains("119 ext. 8"));
    }

    #[test]
    fn test_privacy_mentions_clear() {
        assert!(privacy_page().contains("/clear"));
    }
}
