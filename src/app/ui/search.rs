use std::collections::HashSet;
use std::sync::Arc;

use eframe::egui::{self, Key, Ui};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::hierarchy::NodeId;

use super::super::{SearchMatchCache, ViewModel};

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}

impl ViewModel {
    /// Scores every node of the full hierarchy against the current query,
    /// reusing the previous result while the query is unchanged.
    fn refresh_search_cache(&mut self) {
        let query = self.search.trim();
        if query.is_empty() {
            self.search_match_cache = None;
            return;
        }
        if let Some(cached) = &self.search_match_cache
            && cached.query == query
        {
            return;
        }

        let matcher = SkimMatcherV2::default();
        let mut ranked = self
            .full_layout
            .values()
            .filter_map(|node| {
                let primary = fuzzy_match_score(&matcher, &node.primary, query);
                let secondary = fuzzy_match_score(&matcher, &node.secondary, query);
                primary.max(secondary).map(|score| (node.id, score))
            })
            .collect::<Vec<_>>();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        tracing::trace!(query, matches = ranked.len(), "search refreshed");
        self.search_match_cache = Some(SearchMatchCache {
            query: query.to_owned(),
            best: ranked.first().map(|&(id, _)| id),
            matches: Arc::new(ranked.into_iter().map(|(id, _)| id).collect()),
        });
    }

    pub(in crate::app) fn cached_search_matches(&mut self) -> Option<Arc<HashSet<NodeId>>> {
        self.refresh_search_cache();
        self.search_match_cache
            .as_ref()
            .map(|cached| Arc::clone(&cached.matches))
    }

    /// Expands the way to the highest scoring match and selects it.
    pub(in crate::app) fn reveal_best_match(&mut self) -> bool {
        self.refresh_search_cache();
        let Some(best) = self.search_match_cache.as_ref().and_then(|cached| cached.best) else {
            tracing::debug!(query = self.search.trim(), "no search match to reveal");
            return false;
        };
        self.reveal(best);
        true
    }

    pub(in crate::app) fn draw_search(&mut self, ui: &mut Ui) {
        let response = ui.add(
            egui::TextEdit::singleline(&mut self.search)
                .hint_text("Search words")
                .desired_width(180.0),
        );
        let submitted = response.lost_focus() && ui.input(|input| input.key_pressed(Key::Enter));
        let go = ui
            .add_enabled(!self.search.trim().is_empty(), egui::Button::new("Go"))
            .clicked();
        if submitted || go {
            self.reveal_best_match();
        }

        if let Some(matches) = self.cached_search_matches() {
            ui.label(format!("{} matches", matches.len()));
        }
    }
}
