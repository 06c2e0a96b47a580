// Fixed, pre-written responses
//
// Critical-risk input is never answered by the remote model; it always gets
// one of these templates.

use crate::classify::Language;

const CRISIS_RESPONSE_EN: &str = "🚨 **IMMEDIATE CRISIS SUPPORT NEEDED** 🚨

I'm very concerned about what you've shared. Your safety is the most important thing right now.

**PLEASE CONTACT EMERGENCY SERVICES IMMEDIATELY:**
• **National Suicide Prevention Lifeline: 988**
• **Crisis Text Line: Text HOME to 741741**
• **Emergency Services: 911**

**YOU ARE NOT ALONE:**
• There are people who want to help you right now
• These feelings can change with proper support
• Professional help is available 24/7

**IMMEDIATE STEPS:**
1. Call one of the numbers above RIGHT NOW
2. Go to your nearest emergency room
3. Call a trusted friend or family member
4. Remove any means of self-harm from your area

Please don't wait. Reach out for help immediately. You deserve support and care.";

const CRISIS_RESPONSE_ID: &str = "🚨 **BANTUAN KRISIS SEGERA DIPERLUKAN** 🚨

Saya sangat khawatir dengan apa yang Anda bagikan. Keselamatan Anda adalah hal yang paling penting saat ini.

**SEGERA HUBUNGI LAYANAN DARURAT:**
• **Hotline Kesehatan Mental: 119 ext 8**
• **LSM Jangan Bunuh Diri: 021-9696-9293**
• **Yayasan Pulih: 021-788-42580**
• **Emergency: 112**

**ANDA TIDAK SENDIRIAN:**
• Ada orang-orang yang ingin membantu Anda sekarang juga
• Perasaan ini bisa berubah dengan dukungan yang tepat
• Bantuan profesional tersedia 24/7

**LANGKAH SEGERA:**
1. Hubungi salah satu nomor di atas SEKARANG JUGA
2. Pergi ke UGD rumah sakit terdekat
3. Hubungi teman atau keluarga yang dipercaya
4. Jauhkan benda-benda yang bisa membahayakan diri

Jangan menunda. Segera minta bantuan. Anda layak mendapat dukungan dan perhatian.";

/// Canned crisis intervention response
pub fn crisis_response(language: Language) -> &'static str {
    match language {
        Language::English => CRISIS_RESPONSE_EN,
        Language::Indonesian => CRISIS_RESPONSE_ID,
    }
}

/// Note appended to model answers for high-risk messages
pub fn professional_support_note(language: Language) -> &'static str {
    match language {
        Language::English => {
            "\n\n💙 **Consider Professional Support**: If you feel comfortable, speaking with a mental health professional could provide additional specialized support during this time."
        }
        Language::Indonesian => {
            "\n\n💙 **Pertimbangkan Dukungan Profesional**: Jika Anda merasa nyaman, berbicara dengan profesional kesehatan mental dapat memberikan dukungan khusus tambahan di masa ini."
        }
    }
}

/// Shown when the model call fails
pub fn connection_error_message(language: Language) -> &'static str {
    match language {
        Language::English => {
            "I apologize, but I'm having trouble connecting right now. Please try again, or if this is urgent, please contact a mental health professional or crisis helpline immediately."
        }
        Language::Indonesian => {
            "Maaf, saya mengalami masalah koneksi saat ini. Silakan coba lagi, atau jika ini mendesak, segera hubungi profesional kesehatan mental atau hotline krisis."
        }
    }
}

/// Shown when the model answers with empty content
pub fn empty_response_message(language: Language) -> &'static str {
    match language {
        Language::English => "Sorry, no response received.",
        Language::Indonesian => "Maaf, tidak ada respons yang diterima.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crisis_templates_carry_local_hotlines() {
        let id = crisis_response(Language::Indonesian);
        assert!(id.contains("119 ext 8"));
        assert!(id.contains("112"));

        let en = crisis_response(Language::English);
        assert!(en.contains("988"));
        assert!(en.contains("741741"));
        assert!(en.contains("911"));
    }

    #[test]
    fn test_support_note_is_separated() {
        for lang in [Language::Indonesian, Language::English] {
            assert!(professional_support_note(lang).starts_with("\n\n"));
        }
    }
}
