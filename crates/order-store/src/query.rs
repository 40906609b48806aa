use crate::{CategoryId, Order, OrderStatus, UserId};

/// Builder for order listing filters.
///
/// A filter is a conjunction of optional predicates. A predicate is only
/// active when the caller supplied a non-empty value: an empty category
/// set or a nil identifier adds nothing to the query rather than matching
/// nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    category_ids: Vec<CategoryId>,
    status: Option<OrderStatus>,
    client_id: Option<UserId>,
    master_id: Option<UserId>,
}

impl OrderFilter {
    /// Creates a filter with no predicates (matches every order).
    pub fn new() -> Self {
        Self::default()
    }

    /// Active orders, optionally restricted to some categories.
    pub fn active(category_ids: impl IntoIterator<Item = CategoryId>) -> Self {
        Self::new()
            .categories(category_ids)
            .status(OrderStatus::Active)
    }

    /// Restricts to orders whose category is in the set. Nil identifiers
    /// are ignored; an empty set leaves the predicate out.
    pub fn categories(mut self, category_ids: impl IntoIterator<Item = CategoryId>) -> Self {
        self.category_ids = category_ids.into_iter().filter(|id| !id.is_nil()).collect();
        self
    }

    /// Restricts to an exact status.
    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts to an exact status when one is given.
    pub fn maybe_status(mut self, status: Option<OrderStatus>) -> Self {
        self.status = status;
        self
    }

    /// Restricts to a client. The nil identifier leaves the predicate out.
    pub fn client(mut self, client_id: UserId) -> Self {
        self.client_id = (!client_id.is_nil()).then_some(client_id);
        self
    }

    /// Restricts to a master. The nil identifier leaves the predicate out.
    pub fn master(mut self, master_id: UserId) -> Self {
        self.master_id = (!master_id.is_nil()).then_some(master_id);
        self
    }

    pub fn category_ids(&self) -> &[CategoryId] {
        &self.category_ids
    }

    pub fn status_predicate(&self) -> Option<OrderStatus> {
        self.status
    }

    pub fn client_id(&self) -> Option<UserId> {
        self.client_id
    }

    pub fn master_id(&self) -> Option<UserId> {
        self.master_id
    }

    /// Returns true if no predicate is active.
    pub fn is_unrestricted(&self) -> bool {
        *self == Self::default()
    }

    /// Evaluates the conjunction against an order.
    pub fn matches(&self, order: &Order) -> bool {
        if !self.category_ids.is_empty() && !self.category_ids.contains(&order.category_id) {
            return false;
        }
        if let Some(status) = self.status
            && order.status != status
        {
            return false;
        }
        if let Some(client_id) = self.client_id
            && order.client_id != client_id
        {
            return false;
        }
        if let Some(master_id) = self.master_id
            && order.master_id != Some(master_id)
        {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NewOrder;

    fn order(category_id: CategoryId, client_id: UserId) -> Order {
        NewOrder::new("t", "d", "a", "1", "2", category_id, client_id).into_order(crate::order::now())
    }

    #[test]
    fn zero_values_add_no_predicates() {
        let filter = OrderFilter::new()
            .categories(Vec::new())
            .maybe_status(None)
            .client(UserId::nil())
            .master(UserId::nil());

        assert!(filter.is_unrestricted());
        assert!(filter.matches(&order(CategoryId::new(), UserId::new())));
    }

    #[test]
    fn active_without_categories_only_restricts_status() {
        let filter = OrderFilter::active(Vec::new());
        assert!(filter.category_ids().is_empty());
        assert_eq!(filter.status_predicate(), Some(OrderStatus::Active));

        let mut done = order(CategoryId::new(), UserId::new());
        done.status = OrderStatus::Done;
        assert!(!filter.matches(&done));
    }

    #[test]
    fn category_set_is_membership() {
        let wanted = CategoryId::new();
        let other = CategoryId::new();
        let filter = OrderFilter::new().categories([wanted, CategoryId::new()]);

        assert!(filter.matches(&order(wanted, UserId::new())));
        assert!(!filter.matches(&order(other, UserId::new())));
    }

    #[test]
    fn nil_categories_are_ignored() {
        let filter = OrderFilter::new().categories([CategoryId::nil()]);
        assert!(filter.is_unrestricted());
    }

    #[test]
    fn master_predicate_excludes_unassigned_orders() {
        let master = UserId::new();
        let filter = OrderFilter::new().master(master);

        let mut assigned = order(CategoryId::new(), UserId::new());
        assigned.master_id = Some(master);
        let unassigned = order(CategoryId::new(), UserId::new());

        assert!(filter.matches(&assigned));
        assert!(!filter.matches(&unassigned));
    }

    #[test]
    fn predicates_are_conjunctive() {
        let client = UserId::new();
        let category = CategoryId::new();
        let filter = OrderFilter::new()
            .categories([category])
            .client(client)
            .status(OrderStatus::Active);

        assert!(filter.matches(&order(category, client)));
        assert!(!filter.matches(&order(category, UserId::new())));
        assert!(!filter.matches(&order(CategoryId::new(), client)));
    }
}
