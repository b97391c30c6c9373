//! Setters: typed mutations applied to a component for one element.
//!
//! A setter receives the trimmed text and the attributes of an element and
//! writes the value into a component. Values that cannot be interpreted are
//! reported to the [`WarningSet`] and leave the component unchanged.

use crate::context::LoadingContext;
use crate::objects::{
    normalize_enum_name, parse_bool, parse_double, parse_int, AngleMethod, AxialMethod,
    ClusterConfiguration, Color, ComponentType, Material, MaterialType, Override, PresetType,
    RadiusMethod, RocketComponent, TabRelativePosition, XmlEnum,
};
use crate::reader::Attributes;
use crate::warning::{Warning, WarningSet};

/// Accessor for a field of a component; `None` when the component has no such field.
pub type Field<T> = fn(&mut RocketComponent) -> Option<&mut T>;

/// A bound mutation of one component field.
pub trait Setter: Send + Sync {
    /// Applies the element's text and attributes to a component.
    fn set(
        &self,
        component: &mut RocketComponent,
        value: &str,
        attributes: &Attributes,
        ctx: &LoadingContext<'_>,
        warnings: &mut WarningSet,
    );
}

// ============================================================================
// Scalar setters
// ============================================================================

/// Assigns the text verbatim.
pub struct StringSetter {
    field: Field<String>,
}

impl StringSetter {
    /// Creates a string setter.
    pub fn new(field: Field<String>) -> Self {
        Self { field }
    }
}

impl Setter for StringSetter {
    fn set(
        &self,
        component: &mut RocketComponent,
        value: &str,
        _attributes: &Attributes,
        _ctx: &LoadingContext<'_>,
        _warnings: &mut WarningSet,
    ) {
        if let Some(field) = (self.field)(component) {
            *field = value.to_string();
        }
    }
}

/// Parses an integer.
pub struct IntSetter {
    field: Field<i32>,
}

impl IntSetter {
    /// Creates an integer setter.
    pub fn new(field: Field<i32>) -> Self {
        Self { field }
    }
}

impl Setter for IntSetter {
    fn set(
        &self,
        component: &mut RocketComponent,
        value: &str,
        _attributes: &Attributes,
        _ctx: &LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) {
        match parse_int(value) {
            Some(n) => {
                if let Some(field) = (self.field)(component) {
                    *field = n;
                }
            }
            None => warnings.add(Warning::InvalidParameter),
        }
    }
}

/// Parses `true` or `false`.
pub struct BooleanSetter {
    field: Field<bool>,
}

impl BooleanSetter {
    /// Creates a boolean setter.
    pub fn new(field: Field<bool>) -> Self {
        Self { field }
    }
}

impl Setter for BooleanSetter {
    fn set(
        &self,
        component: &mut RocketComponent,
        value: &str,
        _attributes: &Attributes,
        _ctx: &LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) {
        match parse_bool(value) {
            Some(b) => {
                if let Some(field) = (self.field)(component) {
                    *field = b;
                }
            }
            None => warnings.add(Warning::InvalidParameter),
        }
    }
}

/// Parses a floating point value, optionally scaled.
///
/// A setter with a special token sets a companion flag when the text equals
/// the token and leaves the value alone. A number written to such a field
/// clears the flag again.
pub struct DoubleSetter {
    field: Field<f64>,
    multiplier: f64,
    special: Option<(&'static str, Field<bool>)>,
}

impl DoubleSetter {
    /// Creates a setter storing the parsed value as is.
    pub fn new(field: Field<f64>) -> Self {
        Self {
            field,
            multiplier: 1.0,
            special: None,
        }
    }

    /// Multiplies parsed values before storing them.
    pub fn scaled(field: Field<f64>, multiplier: f64) -> Self {
        Self {
            multiplier,
            ..Self::new(field)
        }
    }

    /// Accepts `token` as a request to set `flag`.
    pub fn with_special(mut self, token: &'static str, flag: Field<bool>) -> Self {
        self.special = Some((token, flag));
        self
    }
}

impl Setter for DoubleSetter {
    fn set(
        &self,
        component: &mut RocketComponent,
        value: &str,
        _attributes: &Attributes,
        _ctx: &LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) {
        if let Some((token, flag)) = self.special {
            if value.trim().eq_ignore_ascii_case(token) {
                if let Some(flag) = flag(component) {
                    *flag = true;
                }
                return;
            }
        }

        let Some(number) = parse_double(value) else {
            warnings.add(Warning::InvalidParameter);
            return;
        };
        if let Some(field) = (self.field)(component) {
            *field = number * self.multiplier;
        }
        if let Some((_, flag)) = self.special {
            if let Some(flag) = flag(component) {
                *flag = false;
            }
        }
    }
}

/// Sets a mass or CG override and enables it.
pub struct OverrideSetter {
    field: Field<Override>,
}

impl OverrideSetter {
    /// Creates an override setter.
    pub fn new(field: Field<Override>) -> Self {
        Self { field }
    }
}

impl Setter for OverrideSetter {
    fn set(
        &self,
        component: &mut RocketComponent,
        value: &str,
        _attributes: &Attributes,
        _ctx: &LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) {
        match parse_double(value) {
            Some(number) => {
                if let Some(field) = (self.field)(component) {
                    field.set(number);
                }
            }
            None => warnings.add(Warning::InvalidParameter),
        }
    }
}

/// Matches the text against the values of an enumeration.
pub struct EnumSetter<E> {
    field: Field<E>,
}

impl<E: XmlEnum> EnumSetter<E> {
    /// Creates an enumeration setter.
    pub fn new(field: Field<E>) -> Self {
        Self { field }
    }
}

impl<E: XmlEnum> Setter for EnumSetter<E> {
    fn set(
        &self,
        component: &mut RocketComponent,
        value: &str,
        _attributes: &Attributes,
        _ctx: &LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) {
        match E::find(value) {
            Some(v) => {
                if let Some(field) = (self.field)(component) {
                    *field = v;
                }
            }
            None => warnings.add(Warning::InvalidParameter),
        }
    }
}

/// Like [`EnumSetter`] for fields that are unset until a document sets them.
pub struct OptionalEnumSetter<E> {
    field: Field<Option<E>>,
}

impl<E: XmlEnum> OptionalEnumSetter<E> {
    /// Creates an optional enumeration setter.
    pub fn new(field: Field<Option<E>>) -> Self {
        Self { field }
    }
}

impl<E: XmlEnum> Setter for OptionalEnumSetter<E> {
    fn set(
        &self,
        component: &mut RocketComponent,
        value: &str,
        _attributes: &Attributes,
        _ctx: &LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) {
        match E::find(value) {
            Some(v) => {
                if let Some(field) = (self.field)(component) {
                    *field = Some(v);
                }
            }
            None => warnings.add(Warning::InvalidParameter),
        }
    }
}

// ============================================================================
// Structured setters
// ============================================================================

/// Reads `red`, `green` and `blue` attributes.
pub struct ColorSetter;

impl Setter for ColorSetter {
    fn set(
        &self,
        component: &mut RocketComponent,
        _value: &str,
        attributes: &Attributes,
        _ctx: &LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) {
        let channel = |name: &str| {
            attributes
                .get(name)
                .and_then(parse_int)
                .and_then(|v| u8::try_from(v).ok())
        };
        match (channel("red"), channel("green"), channel("blue")) {
            (Some(r), Some(g), Some(b)) => component.color = Some(Color::new(r, g, b)),
            _ => warnings.add(Warning::InvalidParameter),
        }
    }
}

/// Reads a material: the name as text and a `density` attribute.
///
/// A `type` attribute naming another category is reported but the material
/// is still created in the category the field requires.
pub struct MaterialSetter {
    field: Field<Material>,
    kind: MaterialType,
}

impl MaterialSetter {
    /// Creates a setter for a material of a category.
    pub fn new(field: Field<Material>, kind: MaterialType) -> Self {
        Self { field, kind }
    }
}

impl Setter for MaterialSetter {
    fn set(
        &self,
        component: &mut RocketComponent,
        value: &str,
        attributes: &Attributes,
        ctx: &LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) {
        if value.is_empty() {
            warnings.add("Illegal material specification, ignoring.");
            return;
        }
        let Some(density) = attributes.get("density").and_then(parse_double) else {
            warnings.add("Illegal material specification, ignoring.");
            return;
        };
        if let Some(declared) = attributes.get("type") {
            if MaterialType::find(declared) != Some(self.kind) {
                warnings.add(Warning::notice(format!(
                    "Material '{}' is declared as {} but used as {}.",
                    value,
                    declared,
                    self.kind.xml_name()
                )));
            }
        }
        let material = ctx.materials().find_material(self.kind, value, density);
        if let Some(field) = (self.field)(component) {
            *field = material;
        }
    }
}

/// Which offset of a component a [`PositionSetter`] writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Along the parent
    Axial,
    /// Away from the parent centerline
    Radial,
    /// Around the parent
    Angular,
}

/// Reads an offset from the text and its reference method from the `method`
/// attribute, falling back to the older `type` attribute.
///
/// Historic method names are translated. A missing or unknown method uses
/// the default method of the axis.
pub struct PositionSetter {
    axis: Axis,
    multiplier: f64,
}

impl PositionSetter {
    /// Creates a setter for one axis.
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            multiplier: 1.0,
        }
    }

    /// Multiplies parsed values before storing them.
    pub fn scaled(axis: Axis, multiplier: f64) -> Self {
        Self { axis, multiplier }
    }
}

fn find_method<E: XmlEnum + Default>(token: Option<&str>, renamed: &[(&str, E)]) -> E {
    let Some(token) = token else {
        return E::default();
    };
    if let Some(method) = E::find(token) {
        return method;
    }
    let wanted = normalize_enum_name(token.trim());
    renamed
        .iter()
        .find(|(old, _)| normalize_enum_name(old) == wanted)
        .map(|(_, method)| *method)
        .unwrap_or_default()
}

impl Setter for PositionSetter {
    fn set(
        &self,
        component: &mut RocketComponent,
        value: &str,
        attributes: &Attributes,
        _ctx: &LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) {
        let component_type = component.component_type();
        let supported = match self.axis {
            Axis::Axial => component_type.supports_axial_offset(),
            Axis::Radial => component_type.supports_radial_offset(),
            Axis::Angular => component_type.supports_angle_offset(),
        };
        if !supported {
            warnings.add(Warning::from_string(format!(
                "Position is not valid for {}, ignoring.",
                component_type
            )));
            return;
        }

        let Some(offset) = parse_double(value) else {
            warnings.add(Warning::InvalidParameter);
            return;
        };
        let offset = offset * self.multiplier;
        let token = attributes.get("method").or_else(|| attributes.get("type"));
        let position = &mut component.position;
        match self.axis {
            Axis::Axial => {
                position.axial_method = find_method(token, AxialMethod::RENAMED);
                position.axial_offset = offset;
            }
            Axis::Radial => {
                position.radius_method = find_method(token, RadiusMethod::RENAMED);
                position.radius_offset = offset;
            }
            Axis::Angular => {
                position.angle_method = find_method(token, AngleMethod::RENAMED);
                position.angle_offset = offset;
            }
        }
    }
}

/// Reads a fin tab shift and its `relativeto` reference.
pub struct FinTabPositionSetter;

impl Setter for FinTabPositionSetter {
    fn set(
        &self,
        component: &mut RocketComponent,
        value: &str,
        attributes: &Attributes,
        _ctx: &LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) {
        let relative = attributes
            .get("relativeto")
            .and_then(TabRelativePosition::find);
        match (relative, parse_double(value), component.fin_set_mut()) {
            (Some(relative), Some(shift), Some(fins)) => {
                fins.tab_relative_to = relative;
                fins.tab_shift = shift;
            }
            (_, _, None) => {}
            _ => warnings.add(Warning::InvalidParameter),
        }
    }
}

/// Reads the cluster arrangement of an inner tube.
pub struct ClusterConfigurationSetter;

impl Setter for ClusterConfigurationSetter {
    fn set(
        &self,
        component: &mut RocketComponent,
        value: &str,
        _attributes: &Attributes,
        _ctx: &LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) {
        match value.parse::<ClusterConfiguration>() {
            Ok(configuration) => {
                if let Some(tube) = component.inner_tube_mut() {
                    tube.cluster_configuration = configuration;
                }
            }
            Err(()) => warnings.add(Warning::InvalidParameter),
        }
    }
}

/// Applies a catalog part named by `manufacturer` and `partno` attributes.
///
/// Among the catalog entries for the part, one whose digest equals the
/// `digest` attribute is preferred, then the first of the component's preset
/// type. A missing match and a digest mismatch are reported separately.
pub struct ComponentPresetSetter;

impl Setter for ComponentPresetSetter {
    fn set(
        &self,
        component: &mut RocketComponent,
        _value: &str,
        attributes: &Attributes,
        ctx: &LoadingContext<'_>,
        warnings: &mut WarningSet,
    ) {
        let component_type = component.component_type();
        let (Some(manufacturer), Some(part_no)) =
            (attributes.get("manufacturer"), attributes.get("partno"))
        else {
            warnings.add(Warning::from_string(format!(
                "Invalid ComponentPreset for {}, no manufacturer or part number specified.",
                component_type
            )));
            return;
        };
        let digest = attributes.get("digest");
        let preset_type = attributes
            .get("type")
            .and_then(PresetType::find)
            .filter(|t| t.component_type() == component_type)
            .or_else(|| preset_type_for(component_type));

        let candidates = ctx.presets().find(manufacturer, part_no);
        let matching = digest
            .and_then(|d| candidates.iter().find(|p| p.digest() == d))
            .or_else(|| candidates.iter().find(|p| Some(p.preset_type) == preset_type));

        let Some(preset) = matching else {
            warnings.add(Warning::from_string(format!(
                "No matching ComponentPreset found for {} {}.",
                manufacturer, part_no
            )));
            return;
        };

        if let Some(digest) = digest {
            if preset.digest() != digest {
                warnings.add(Warning::notice(format!(
                    "ComponentPreset for {} {} has wrong digest.",
                    manufacturer, part_no
                )));
            }
        }

        if !component.load_preset(preset) {
            warnings.add(Warning::from_string(format!(
                "ComponentPreset {} {} can not be applied to {}, ignoring.",
                manufacturer, part_no, component_type
            )));
        }
    }
}

fn preset_type_for(component_type: ComponentType) -> Option<PresetType> {
    PresetType::VARIANTS
        .iter()
        .copied()
        .find(|t| t.component_type() == component_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PresetCatalog;
    use crate::objects::{ComponentPreset, Finish};

    fn set(setter: &dyn Setter, c: &mut RocketComponent, value: &str, attrs: &[(&str, &str)]) -> WarningSet {
        let ctx = LoadingContext::new();
        let mut warnings = WarningSet::new();
        let attributes: Attributes = attrs.iter().copied().collect();
        setter.set(c, value, &attributes, &ctx, &mut warnings);
        warnings
    }

    fn tube() -> RocketComponent {
        RocketComponent::new(ComponentType::BodyTube)
    }

    #[test]
    fn test_double_accepts_special_tokens() {
        let setter = DoubleSetter::new(RocketComponent::body_length_mut);
        for (text, check) in [
            ("Inf", f64::is_infinite as fn(f64) -> bool),
            ("-Inf", f64::is_infinite),
            ("NaN", f64::is_nan),
        ] {
            let mut c = tube();
            let warnings = set(&setter, &mut c, text, &[]);
            assert!(warnings.is_empty());
            assert!(check(c.length().unwrap()));
        }
    }

    #[test]
    fn test_int_rejects_special_tokens() {
        let setter = IntSetter::new(|c| c.fin_set_mut().map(|f| &mut f.fin_count));
        for text in ["Inf", "-Inf", "NaN", "three"] {
            let mut c = RocketComponent::new(ComponentType::TrapezoidFinSet);
            let warnings = set(&setter, &mut c, text, &[]);
            assert_eq!(warnings.len(), 1);
            assert_eq!(c.fin_set().unwrap().fin_count, 3);
        }
    }

    #[test]
    fn test_double_multiplier_and_auto() {
        let setter = DoubleSetter::new(|c| c.body_tube_mut().map(|t| &mut t.outer_radius))
            .with_special("auto", |c| c.body_tube_mut().map(|t| &mut t.outer_radius_automatic));
        let mut c = tube();
        assert!(set(&setter, &mut c, "AUTO", &[]).is_empty());
        let t = c.body_tube().unwrap();
        assert!(t.outer_radius_automatic);
        assert_eq!(t.outer_radius, 0.025);

        assert!(set(&setter, &mut c, "0.03", &[]).is_empty());
        let t = c.body_tube().unwrap();
        assert!(!t.outer_radius_automatic);
        assert_eq!(t.outer_radius, 0.03);

        let degrees = DoubleSetter::scaled(
            |c| c.fin_set_mut().map(|f| &mut f.cant_angle),
            std::f64::consts::PI / 180.0,
        );
        let mut fins = RocketComponent::new(ComponentType::EllipticalFinSet);
        set(&degrees, &mut fins, "90", &[]);
        assert!((fins.fin_set().unwrap().cant_angle - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_boolean() {
        let setter = BooleanSetter::new(|c| Some(&mut c.override_subcomponents));
        let mut c = tube();
        assert!(set(&setter, &mut c, "TRUE", &[]).is_empty());
        assert!(c.override_subcomponents);
        assert_eq!(set(&setter, &mut c, "yes", &[]).len(), 1);
        assert!(c.override_subcomponents);
    }

    #[test]
    fn test_enum_normalization() {
        let setter = EnumSetter::<Finish>::new(|c| c.external_mut().map(|e| &mut e.finish));
        for text in ["polished", "POLISHED", "Pol_ished"] {
            let mut c = tube();
            assert!(set(&setter, &mut c, text, &[]).is_empty());
            assert_eq!(c.body_tube().unwrap().external.finish, Finish::Polished);
        }
        let mut c = tube();
        assert_eq!(set(&setter, &mut c, "glossy", &[]).len(), 1);
        assert_eq!(c.body_tube().unwrap().external.finish, Finish::Normal);
    }

    #[test]
    fn test_override_is_atomic() {
        let setter = OverrideSetter::new(|c| Some(&mut c.mass_override));
        let mut c = tube();
        assert_eq!(set(&setter, &mut c, "heavy", &[]).len(), 1);
        assert!(!c.mass_override.enabled);
        set(&setter, &mut c, "0.125", &[]);
        assert!(c.mass_override.enabled);
        assert_eq!(c.mass_override.value, 0.125);
    }

    #[test]
    fn test_position_methods() {
        let setter = PositionSetter::new(Axis::Axial);
        let mut fins = RocketComponent::new(ComponentType::TrapezoidFinSet);
        set(&setter, &mut fins, "-0.01", &[("method", "bottom")]);
        assert_eq!(fins.position.axial_method, AxialMethod::Bottom);
        assert_eq!(fins.position.axial_offset, -0.01);

        set(&setter, &mut fins, "0.02", &[("type", "aft")]);
        assert_eq!(fins.position.axial_method, AxialMethod::Bottom);

        set(&setter, &mut fins, "0.03", &[("method", "sideways")]);
        assert_eq!(fins.position.axial_method, AxialMethod::Top);

        let mut nose = RocketComponent::new(ComponentType::NoseCone);
        let warnings = set(&setter, &mut nose, "0.1", &[]);
        assert_eq!(warnings.len(), 1);
        assert_eq!(nose.position.axial_offset, 0.0);
    }

    #[test]
    fn test_color() {
        let mut c = tube();
        set(&ColorSetter, &mut c, "", &[("red", "255"), ("green", "0"), ("blue", "16")]);
        assert_eq!(c.color, Some(Color::new(255, 0, 16)));
        let warnings = set(&ColorSetter, &mut c, "", &[("red", "300"), ("green", "0"), ("blue", "0")]);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_material() {
        let setter = MaterialSetter::new(
            |c| c.external_mut().map(|e| &mut e.material),
            MaterialType::Bulk,
        );
        let mut c = tube();
        assert!(set(&setter, &mut c, "Balsa", &[("density", "170")]).is_empty());
        assert_eq!(c.material().unwrap().name, "Balsa");
        assert!(!c.material().unwrap().user_defined);

        let warnings = set(&setter, &mut c, "Unobtainium", &[("density", "9000"), ("type", "surface")]);
        assert_eq!(warnings.len(), 1);
        assert!(!warnings.has_data_loss());
        assert_eq!(c.material().unwrap().kind, MaterialType::Bulk);
        assert!(c.material().unwrap().user_defined);

        assert_eq!(set(&setter, &mut c, "Balsa", &[]).len(), 1);
    }

    #[test]
    fn test_preset_lookup() {
        let catalog: PresetCatalog = vec![
            ComponentPreset::new("Estes", "BT-20", PresetType::BodyTube).with_length(0.2),
            ComponentPreset::new("Estes", "BT-20", PresetType::BodyTube).with_length(0.3),
        ]
        .into_iter()
        .collect();
        let ctx = LoadingContext::new().with_presets(&catalog);
        let digest = ComponentPreset::new("Estes", "BT-20", PresetType::BodyTube)
            .with_length(0.3)
            .digest();

        let mut warnings = WarningSet::new();
        let mut c = tube();
        let attributes: Attributes = vec![("manufacturer", "Estes"), ("partno", "BT-20"), ("digest", digest.as_str())]
            .into_iter()
            .collect();
        ComponentPresetSetter.set(&mut c, "", &attributes, &ctx, &mut warnings);
        assert!(warnings.is_empty());
        assert_eq!(c.length(), Some(0.3));

        let mut c = tube();
        let attributes: Attributes = vec![("manufacturer", "Estes"), ("partno", "BT-20"), ("digest", "0000")]
            .into_iter()
            .collect();
        ComponentPresetSetter.set(&mut c, "", &attributes, &ctx, &mut warnings);
        assert_eq!(warnings.len(), 1);
        assert_eq!(c.length(), Some(0.2));

        let mut c = tube();
        let attributes: Attributes = vec![("manufacturer", "Quest"), ("partno", "X")].into_iter().collect();
        ComponentPresetSetter.set(&mut c, "", &attributes, &ctx, &mut warnings);
        assert_eq!(warnings.len(), 2);
        assert!(c.preset.is_none());
    }
}
