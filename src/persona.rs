/// Theme variant assigned to each persona. Purely a presentation lookup,
/// no behavior hangs off it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonaColor {
    Cyan,
    Purple,
    Rose,
}

/// A static profile describing a simulated conversational identity.
/// Defined at compile time, never created or destroyed at runtime.
#[derive(Debug, Clone, Copy)]
pub struct Persona {
    pub id: &'static str,
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    /// Remote avatar image. The TUI renders a first-letter monogram instead,
    /// but the reference stays with the record.
    pub avatar: &'static str,
    pub color: PersonaColor,
    pub expertise: &'static [&'static str],
}

static PERSONAS: &[Persona] = &[
    Persona {
        id: "nikhil",
        name: "Nikhil Kamath",
        title: "Co-Founder & CIO of Zerodha",
        description: "Nikhil Kamath is the co-founder and Chief Investment Officer of Zerodha, \
            one of India's largest and most popular online stock brokerage firms. With a deep \
            understanding of trading, investing, and the financial markets, Nikhil is a thought \
            leader in the Indian fintech and stock trading space.",
        avatar: "https://media.fortuneindia.com/fortune-india/NikhilKamath.jpg",
        color: PersonaColor::Cyan,
        expertise: &[
            "Stock Trading",
            "Fintech",
            "Investment Strategies",
            "Startup Mentorship",
        ],
    },
    Persona {
        id: "kiran",
        name: "Kiran Mazumdar-Shaw",
        title: "Founder & Chairperson of Biocon",
        description: "Kiran Mazumdar-Shaw is the founder and chairperson of Biocon, India's \
            largest biopharmaceutical company. With a focus on healthcare innovation, biotech \
            development, and leadership in the pharmaceutical industry, Kiran has been \
            instrumental in driving the company's success and contributing to global health \
            advancements.",
        avatar: "https://icrier.org/wp-content/uploads/2022/09/Dr.-Kiran-Mazumdar-Shaw.jpg",
        color: PersonaColor::Purple,
        expertise: &[
            "Biotechnology",
            "Pharmaceuticals",
            "Healthcare Innovation",
            "Leadership",
        ],
    },
    Persona {
        id: "sima",
        name: "Sima Taparia",
        title: "Celebrity Matchmaker",
        description: "Sima Taparia is a well-known celebrity matchmaker based in Mumbai. With a \
            career spanning over 30 years, she specializes in helping individuals find \
            compatible partners through personalized matchmaking services. Sima is known for \
            her appearances on Netflix's show \"Indian Matchmaking\".",
        avatar: "https://images.mid-day.com/images/images/2023/jun/simataparia4shorts_ws.jpg",
        color: PersonaColor::Rose,
        expertise: &[
            "Matchmaking",
            "Relationship Counseling",
            "Cultural Compatibility",
            "Personalized Services",
        ],
    },
];

impl Persona {
    /// The full catalog, in display order.
    pub fn all() -> &'static [Persona] {
        PERSONAS
    }

    pub fn monogram(&self) -> char {
        self.name.chars().next().unwrap_or('?')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_order_is_stable() {
        let ids: Vec<&str> = Persona::all().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["nikhil", "kiran", "sima"]);
    }

    #[test]
    fn catalog_entries_are_well_formed() {
        for persona in Persona::all() {
            assert!(!persona.id.is_empty());
            assert!(!persona.name.is_empty());
            assert!(!persona.title.is_empty());
            assert!(!persona.expertise.is_empty());
        }
    }

    #[test]
    fn monogram_is_first_letter_of_name() {
        assert_eq!(Persona::all()[0].monogram(), 'N');
        assert_eq!(Persona::all()[2].monogram(), 'S');
    }
}
