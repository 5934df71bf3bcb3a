//! Dynamic component registry.
//!
//! A build moves through two phases. During contribution, modules append to a
//! [`DynamicComponents`] builder, which deliberately exposes no getters so a
//! module cannot observe what another module contributed. [`DynamicComponents::freeze`]
//! consumes the builder and yields [`FrozenComponents`], the read-only view the
//! assembler unions into cross-cutting constraints.
//!
//! Keyed collections are `BTreeMap`s and ordered collections are `Vec`s, so
//! iteration during assembly and export is reproducible.

use crate::error::{GridplanError, GridplanResult};
use crate::ids::{BalancingArea, LoadZone, Period, ProjectId, Timepoint};
use crate::kinds::{ReserveProduct, RoomTarget};
use crate::lp::{LinearExpr, VarId};
use std::collections::BTreeMap;

/// Operating range of one project in one timepoint, as fractions of capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchEnvelope {
    pub power: VarId,
    pub load_zone: LoadZone,
    pub period: Period,
    pub max_fraction: f64,
    pub min_fraction: f64,
}

/// Reserve provision variable drawing on a project's headroom or footroom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProvisionRef {
    pub product: ReserveProduct,
    pub variable: VarId,
    pub derate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalancingAreaSettings {
    pub allow_violation: bool,
    pub violation_penalty_per_mw: f64,
}

impl Default for BalancingAreaSettings {
    fn default() -> Self {
        Self {
            allow_violation: false,
            violation_penalty_per_mw: 0.0,
        }
    }
}

/// Named term of the objective function.
#[derive(Debug, Clone, PartialEq)]
pub struct CostComponent {
    pub name: String,
    pub expr: LinearExpr,
}

type ProjectPeriods = Vec<(ProjectId, Period)>;

type ReserveMap<T> = BTreeMap<ReserveProduct, BTreeMap<(BalancingArea, Timepoint), T>>;

/// Contribution-phase registry. Append-only.
#[derive(Debug, Default)]
pub struct DynamicComponents {
    contributors: Vec<String>,
    operational_period_sets: Vec<(String, ProjectPeriods)>,
    capacity_expressions: BTreeMap<(ProjectId, Period), LinearExpr>,
    dispatch_envelopes: BTreeMap<(ProjectId, Timepoint), DispatchEnvelope>,
    load_balance_production: BTreeMap<(LoadZone, Timepoint), Vec<VarId>>,
    headroom_variables: BTreeMap<(ProjectId, Timepoint), Vec<ProvisionRef>>,
    footroom_variables: BTreeMap<(ProjectId, Timepoint), Vec<ProvisionRef>>,
    reserve_contributions: ReserveMap<Vec<VarId>>,
    reserve_requirements: ReserveMap<f64>,
    reserve_balancing_areas: BTreeMap<ReserveProduct, BTreeMap<BalancingArea, BalancingAreaSettings>>,
    cost_components: Vec<CostComponent>,
}

impl DynamicComponents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `module` is contributing next.
    pub fn begin_module(&mut self, module: impl Into<String>) {
        self.contributors.push(module.into());
    }

    /// Register a capacity type's (project, period) set. The set reaches the
    /// model only at assembly, after the registry is frozen.
    pub fn add_operational_period_set(
        &mut self,
        set_name: impl Into<String>,
        members: ProjectPeriods,
    ) -> GridplanResult<()> {
        let set_name = set_name.into();
        if self
            .operational_period_sets
            .iter()
            .any(|(name, _)| *name == set_name)
        {
            return Err(GridplanError::Registry(format!(
                "operational-period set '{}' contributed twice",
                set_name
            )));
        }
        self.operational_period_sets.push((set_name, members));
        Ok(())
    }

    pub fn add_capacity_expression(
        &mut self,
        project: ProjectId,
        period: Period,
        capacity: LinearExpr,
    ) -> GridplanResult<()> {
        let key = (project, period);
        if self.capacity_expressions.contains_key(&key) {
            return Err(GridplanError::Registry(format!(
                "capacity of project '{}' in period {} contributed twice",
                key.0, key.1
            )));
        }
        self.capacity_expressions.insert(key, capacity);
        Ok(())
    }

    pub fn add_dispatch_envelope(
        &mut self,
        project: ProjectId,
        timepoint: Timepoint,
        envelope: DispatchEnvelope,
    ) -> GridplanResult<()> {
        let key = (project, timepoint);
        if self.dispatch_envelopes.contains_key(&key) {
            return Err(GridplanError::Registry(format!(
                "dispatch of project '{}' in timepoint {} contributed twice",
                key.0, key.1
            )));
        }
        self.dispatch_envelopes.insert(key, envelope);
        Ok(())
    }

    pub fn add_load_balance_production(&mut self, zone: LoadZone, timepoint: Timepoint, power: VarId) {
        self.load_balance_production
            .entry((zone, timepoint))
            .or_default()
            .push(power);
    }

    /// Append a provision variable to the project's headroom or footroom list.
    pub fn add_provision(
        &mut self,
        target: RoomTarget,
        project: ProjectId,
        timepoint: Timepoint,
        provision: ProvisionRef,
    ) {
        let collection = match target {
            RoomTarget::Headroom => &mut self.headroom_variables,
            RoomTarget::Footroom => &mut self.footroom_variables,
        };
        collection.entry((project, timepoint)).or_default().push(provision);
    }

    pub fn add_reserve_contribution(
        &mut self,
        product: ReserveProduct,
        area: BalancingArea,
        timepoint: Timepoint,
        variable: VarId,
    ) {
        self.reserve_contributions
            .entry(product)
            .or_default()
            .entry((area, timepoint))
            .or_default()
            .push(variable);
    }

    pub fn add_reserve_requirement(
        &mut self,
        product: ReserveProduct,
        area: BalancingArea,
        timepoint: Timepoint,
        requirement_mw: f64,
    ) {
        self.reserve_requirements
            .entry(product)
            .or_default()
            .insert((area, timepoint), requirement_mw);
    }

    pub fn add_reserve_balancing_area(
        &mut self,
        product: ReserveProduct,
        area: BalancingArea,
        settings: BalancingAreaSettings,
    ) {
        self.reserve_balancing_areas
            .entry(product)
            .or_default()
            .insert(area, settings);
    }

    pub fn add_cost_component(&mut self, name: impl Into<String>, expr: LinearExpr) {
        self.cost_components.push(CostComponent {
            name: name.into(),
            expr,
        });
    }

    /// End the contribution phase.
    pub fn freeze(self) -> FrozenComponents {
        FrozenComponents { inner: self }
    }
}

/// Assembly-phase, read-only view of everything contributed.
#[derive(Debug)]
pub struct FrozenComponents {
    inner: DynamicComponents,
}

impl FrozenComponents {
    /// Module names in contribution order.
    pub fn contributors(&self) -> &[String] {
        &self.inner.contributors
    }

    /// Operational-period sets with their members, in contribution order.
    pub fn operational_period_sets(&self) -> impl Iterator<Item = (&str, &[(ProjectId, Period)])> {
        self.inner
            .operational_period_sets
            .iter()
            .map(|(name, members)| (name.as_str(), members.as_slice()))
    }

    pub fn capacity_expression(&self, project: &ProjectId, period: Period) -> Option<&LinearExpr> {
        self.inner.capacity_expressions.get(&(project.clone(), period))
    }

    pub fn capacity_expressions(&self) -> impl Iterator<Item = (&(ProjectId, Period), &LinearExpr)> {
        self.inner.capacity_expressions.iter()
    }

    pub fn dispatch_envelopes(&self) -> impl Iterator<Item = (&(ProjectId, Timepoint), &DispatchEnvelope)> {
        self.inner.dispatch_envelopes.iter()
    }

    pub fn load_balance_production(&self) -> &BTreeMap<(LoadZone, Timepoint), Vec<VarId>> {
        &self.inner.load_balance_production
    }

    pub fn provisions(&self, target: RoomTarget, project: &ProjectId, timepoint: Timepoint) -> &[ProvisionRef] {
        let collection = match target {
            RoomTarget::Headroom => &self.inner.headroom_variables,
            RoomTarget::Footroom => &self.inner.footroom_variables,
        };
        collection
            .get(&(project.clone(), timepoint))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn all_provisions(
        &self,
        target: RoomTarget,
    ) -> impl Iterator<Item = (&(ProjectId, Timepoint), &Vec<ProvisionRef>)> {
        match target {
            RoomTarget::Headroom => self.inner.headroom_variables.iter(),
            RoomTarget::Footroom => self.inner.footroom_variables.iter(),
        }
    }

    /// Products that registered either contributions or requirements.
    pub fn reserve_products(&self) -> Vec<ReserveProduct> {
        let mut products: Vec<ReserveProduct> = self
            .inner
            .reserve_contributions
            .keys()
            .chain(self.inner.reserve_requirements.keys())
            .copied()
            .collect();
        products.sort();
        products.dedup();
        products
    }

    pub fn reserve_contributions(&self, product: ReserveProduct) -> Option<&BTreeMap<(BalancingArea, Timepoint), Vec<VarId>>> {
        self.inner.reserve_contributions.get(&product)
    }

    pub fn reserve_requirements(&self, product: ReserveProduct) -> Option<&BTreeMap<(BalancingArea, Timepoint), f64>> {
        self.inner.reserve_requirements.get(&product)
    }

    pub fn balancing_area_settings(&self, product: ReserveProduct, area: &BalancingArea) -> BalancingAreaSettings {
        self.inner
            .reserve_balancing_areas
            .get(&product)
            .and_then(|areas| areas.get(area))
            .copied()
            .unwrap_or_default()
    }

    pub fn cost_components(&self) -> &[CostComponent] {
        &self.inner.cost_components
    }
}
