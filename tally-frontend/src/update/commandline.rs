use crate::model::Model;

use super::search;

pub fn insert(model: &mut Model, c: char) {
    dismiss_displayed(model);
    model.view.search_text.push(c);
}

pub fn delete(model: &mut Model) {
    dismiss_displayed(model);
    model.view.search_text.pop();
}

// NOTE: a shown result only lives until the user starts editing the next search
fn dismiss_displayed(model: &mut Model) {
    if model.view.last_result.is_some() {
        search::dismiss(model);
    }
}

#[cfg(test)]
mod test {
    use crate::model::region::RegionStatistics;

    use super::*;

    #[test]
    fn insert_and_delete_edit_search_text() {
        let mut model = Model::default();

        insert(&mut model, 'o');
        insert(&mut model, 'h');
        insert(&mut model, 'x');
        delete(&mut model);

        assert_eq!("oh", model.view.search_text);
    }

    #[test]
    fn editing_dismisses_displayed_result() {
        let mut model = Model::default();
        model.view.last_result = Some(RegionStatistics {
            confirmed_total: 1,
            deaths_total: 0,
            new_confirmed: 0,
            new_deaths: 0,
            last_updated: "today".to_string(),
            region_name: "ohio".to_string(),
            region_id: "ohio".to_string(),
        });
        model.view.pending_region_id = Some("ohio".to_string());

        insert(&mut model, 'u');

        assert!(model.view.last_result.is_none());
        assert!(model.view.pending_region_id.is_none());
        assert_eq!("u", model.view.search_text);
    }
}
