//! Activity identity assignment.
//!
//! The oracle does not return stable identifiers, so every plan that enters
//! the engine (oracle result or loaded file) is stamped here before the
//! store or UI addresses activities by id.

use std::collections::HashSet;

use uuid::Uuid;

use crate::model::Plan;

/// Give every activity a unique id.
///
/// Activities missing an id receive a fresh v4 UUID. Activities that
/// already carry one keep it, unless the same id appears earlier in the
/// plan, in which case the later occurrence is re-stamped. After the call
/// all activity ids within the plan are unique; stamping an already-stamped
/// plan changes nothing.
pub fn stamp_ids(plan: &mut Plan) {
    let mut seen: HashSet<Uuid> = HashSet::new();

    for day in &mut plan.days {
        for activity in &mut day.activities {
            match activity.id {
                Some(id) if seen.insert(id) => {}
                _ => {
                    let mut id = Uuid::new_v4();
                    while !seen.insert(id) {
                        id = Uuid::new_v4();
                    }
                    activity.id = Some(id);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Activity, ActivityKind, CostBreakdown, DayPlan};

    fn activity(name: &str, id: Option<Uuid>) -> Activity {
        Activity {
            id,
            name: name.to_string(),
            description: String::new(),
            city: "Rome".to_string(),
            kind: ActivityKind::Touristy,
            average_cost: 0.0,
            cost_breakdown: CostBreakdown::default(),
            lat: 0.0,
            lng: 0.0,
            duration: None,
            visiting_tip: None,
            links: vec![],
        }
    }

    fn plan_with(activities: Vec<Activity>) -> Plan {
        Plan {
            days: vec![DayPlan {
                day: 1,
                title: "Day one".to_string(),
                activities,
                tips: vec![],
                travel: None,
                user_note: None,
                weather: None,
            }],
            ..Plan::default()
        }
    }

    #[test]
    fn missing_ids_are_assigned() {
        let mut plan = plan_with(vec![activity("a", None), activity("b", None)]);
        stamp_ids(&mut plan);
        let ids: Vec<_> = plan.days[0].activities.iter().map(|a| a.id).collect();
        assert!(ids.iter().all(Option::is_some));
        assert_ne!(ids[0], ids[1]);
    }

    #[test]
    fn existing_ids_are_kept() {
        let keep = Uuid::new_v4();
        let mut plan = plan_with(vec![activity("a", Some(keep)), activity("b", None)]);
        stamp_ids(&mut plan);
        assert_eq!(plan.days[0].activities[0].id, Some(keep));
    }

    #[test]
    fn stamping_twice_is_stable() {
        let mut plan = plan_with(vec![activity("a", None), activity("b", None)]);
        stamp_ids(&mut plan);
        let first = plan.clone();
        stamp_ids(&mut plan);
        assert_eq!(plan, first);
    }

    #[test]
    fn duplicate_ids_are_restamped() {
        let dup = Uuid::new_v4();
        let mut plan = plan_with(vec![activity("a", Some(dup)), activity("b", Some(dup))]);
        stamp_ids(&mut plan);
        let ids: Vec<_> = plan.days[0].activities.iter().map(|a| a.id).collect();
        assert_eq!(ids[0], Some(dup));
        assert_ne!(ids[1], Some(dup));
        assert!(ids[1].is_some());
    }
}
