//! Bundled comic-industry stories.
//!
//! Seeds the queue at construction and backs the cache when retrieval fails.

use chrono::{DateTime, Duration, Utc};

use crate::item::{EntityKind, Impact, NewsItem, RelatedEntity};

struct Story {
    id: &'static str,
    title: &'static str,
    summary: &'static str,
    body: &'static str,
    source: &'static str,
    hours_ago: i64,
    impact: Impact,
    related: Option<(EntityKind, &'static str, &'static str)>,
    keywords: &'static [&'static str],
}

const STORIES: &[Story] = &[
    Story {
        id: "marvel-spider-man-beyond",
        title: "Marvel Announces 'Spider-Man: Beyond' with New Creative Team",
        summary: "Marvel unveils a new direction for Spider-Man led by a high-profile writer and artist pairing.",
        body: "Marvel Comics revealed 'Spider-Man: Beyond', a relaunch that gives the web-slinger a new power set and a reworked rogues gallery. The oversized first issue ships in September with a slate of variant covers, and editors promise consequences across the wider line.",
        source: "Marvel Entertainment",
        hours_ago: 2,
        impact: Impact::Positive,
        related: Some((EntityKind::Comic, "ASM300", "Amazing Spider-Man")),
        keywords: &["Marvel", "Spider-Man", "Relaunch"],
    },
    Story {
        id: "dc-digital-sales-growth",
        title: "DC Comics Reports Record Digital Sales Growth",
        summary: "Digital comic revenue at DC rose sharply in the first quarter.",
        body: "DC Comics said digital sales climbed 45% year over year, driven by its subscription service and digital-first titles. Analysts read the result as market expansion rather than cannibalisation of print, and DC plans further investment in guided reading and localisation.",
        source: "DC Comics",
        hours_ago: 4,
        impact: Impact::Positive,
        related: Some((EntityKind::Publisher, "DCCP", "DC Comics")),
        keywords: &["DC Comics", "Digital", "Sales"],
    },
    Story {
        id: "mcfarlane-spawn-expansion",
        title: "Todd McFarlane Expands the Spawn Universe",
        summary: "Four new ongoing series will broaden the Spawn line.",
        body: "Todd McFarlane announced four ongoing Spawn series, starting with 'King Spawn'. Pre-orders for the first issue set records for Image Comics, and McFarlane hinted at screen adaptations of the expanded line.",
        source: "Image Comics",
        hours_ago: 6,
        impact: Impact::Positive,
        related: Some((EntityKind::Creator, "TMFS", "Todd McFarlane")),
        keywords: &["Todd McFarlane", "Spawn", "Image Comics"],
    },
    Story {
        id: "convention-challenges",
        title: "Comic Convention Circuit Faces Logistical Challenges",
        summary: "Rising venue costs squeeze organisers ahead of the convention season.",
        body: "Organisers report venue rates up 20 to 30 percent on pre-pandemic levels. Several smaller shows have postponed, while the largest events have confirmed dates but warn of higher ticket prices.",
        source: "Comics Business Report",
        hours_ago: 8,
        impact: Impact::Negative,
        related: None,
        keywords: &["Conventions", "Events", "Costs"],
    },
    Story {
        id: "golden-age-auction-record",
        title: "Golden Age Key Issue Sets Auction Record",
        summary: "A high-grade Golden Age copy sold well above its estimate.",
        body: "A certified high-grade copy of a Golden Age key issue closed at a record price after a bidding war between private collectors. Dealers expect the sale to lift asking prices for comparable books in the coming weeks.",
        source: "Heritage Collectibles",
        hours_ago: 10,
        impact: Impact::Positive,
        related: Some((EntityKind::Comic, "ACM1", "Action Comics #1")),
        keywords: &["Auction", "Golden Age", "Collectibles"],
    },
    Story {
        id: "paper-supply-delays",
        title: "Paper Shortage Delays Monthly Releases",
        summary: "Printers warn of slipping ship dates across several publishers.",
        body: "A shortage of coated paper stock has pushed back release dates for a number of monthly titles. Publishers are prioritising flagship books, and retailers are bracing for uneven weekly shipments through the quarter.",
        source: "Retailer Weekly",
        hours_ago: 12,
        impact: Impact::Negative,
        related: Some((EntityKind::Publisher, "MRVL", "Marvel Comics")),
        keywords: &["Printing", "Supply Chain", "Delays"],
    },
    Story {
        id: "indie-crowdfunding-milestone",
        title: "Independent Creators Hit Crowdfunding Milestone",
        summary: "Creator-owned campaigns raised record totals this year.",
        body: "Crowdfunded comic campaigns passed a new annual funding high, with several creator-owned projects clearing their goals within hours. Observers point to direct fan relationships as a durable alternative to traditional publishing deals.",
        source: "Indie Comics Journal",
        hours_ago: 16,
        impact: Impact::Positive,
        related: None,
        keywords: &["Crowdfunding", "Independent", "Creators"],
    },
    Story {
        id: "batman-film-delay",
        title: "Batman Sequel Pushed Back a Year",
        summary: "The studio moved the sequel's release date amid script rewrites.",
        body: "The next Batman feature has been delayed by a year while the script is reworked. Speculators who bought related keys ahead of the original date are reassessing their positions.",
        source: "Screen Industry Daily",
        hours_ago: 20,
        impact: Impact::Negative,
        related: Some((EntityKind::Comic, "BAT1", "Batman #1")),
        keywords: &["Batman", "Film", "Delay"],
    },
    Story {
        id: "grading-backlog-cleared",
        title: "Grading Service Clears Submission Backlog",
        summary: "Turnaround times return to normal at a major grading service.",
        body: "A leading grading company says its submission backlog is cleared and standard turnaround is back to a few weeks. Collectors expect a wave of newly slabbed books to reach the market.",
        source: "Collector's Ledger",
        hours_ago: 26,
        impact: Impact::Neutral,
        related: None,
        keywords: &["Grading", "Collectibles"],
    },
    Story {
        id: "manga-market-share",
        title: "Manga Extends Lead in Bookstore Sales",
        summary: "Manga volumes again outsold superhero collections in bookstores.",
        body: "Bookstore data shows manga extending its lead over superhero trade paperbacks. Western publishers are adding manga-style formats and digest sizes in response.",
        source: "Book Trade Monitor",
        hours_ago: 32,
        impact: Impact::Neutral,
        related: None,
        keywords: &["Manga", "Bookstores", "Sales"],
    },
    Story {
        id: "x-men-relaunch-options",
        title: "X-Men Relaunch Sparks Options Activity",
        summary: "Call volume on X-Men keys jumped after the relaunch announcement.",
        body: "Traders piled into calls on early X-Men issues after Marvel confirmed a line-wide relaunch. Implied volatility on the series sits at its highest level this year.",
        source: "Panel Markets",
        hours_ago: 40,
        impact: Impact::Positive,
        related: Some((EntityKind::Option, "XMN1C", "X-Men #1 Calls")),
        keywords: &["X-Men", "Options", "Marvel"],
    },
    Story {
        id: "distributor-consolidation",
        title: "Direct Market Distributors Announce Merger",
        summary: "Two distributors plan to combine, raising concerns among retailers.",
        body: "Two direct market distributors plan to merge pending regulatory review. Retailers worry about reduced choice and tighter credit terms, while the companies promise lower shipping costs.",
        source: "Retailer Weekly",
        hours_ago: 48,
        impact: Impact::Negative,
        related: None,
        keywords: &["Distribution", "Retail", "Merger"],
    },
];

/// The bundled stories, stamped relative to `now` and ordered newest first.
pub fn static_corpus(now: DateTime<Utc>) -> Vec<NewsItem> {
    STORIES
        .iter()
        .map(|story| NewsItem {
            id: story.id.to_owned(),
            title: story.title.to_owned(),
            summary: story.summary.to_owned(),
            body: story.body.to_owned(),
            source: story.source.to_owned(),
            url: format!("/news/{}", story.id),
            image_url: None,
            published_at: now - Duration::hours(story.hours_ago),
            impact: story.impact,
            related_entity: story
                .related
                .map(|(kind, symbol, name)| RelatedEntity {
                    kind,
                    symbol: symbol.to_owned(),
                    display_name: name.to_owned(),
                }),
            keywords: story.keywords.iter().map(|k| (*k).to_owned()).collect(),
        })
        .collect()
}
