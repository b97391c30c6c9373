//! Setter registrations of the native dialect.

use super::registry::SetterRegistryBuilder;
use super::setters::{
    Axis, BooleanSetter, ClusterConfigurationSetter, ColorSetter, ComponentPresetSetter,
    DoubleSetter, EnumSetter, FinTabPositionSetter, IntSetter, MaterialSetter,
    OptionalEnumSetter, OverrideSetter, PositionSetter, StringSetter,
};
use crate::objects::{
    ComponentClass as C, CrossSection, DeployEvent, Finish, LineStyle, MassComponentType,
    MaterialType, ReferenceType, SeparationEvent, Shape,
};

/// Degrees to radians.
const DEG: f64 = std::f64::consts::PI / 180.0;

pub(crate) fn register_native(b: &mut SetterRegistryBuilder) {
    register_common(b);
    register_external(b);
    register_fins(b);
    register_internal(b);
    register_assemblies(b);
}

fn register_common(b: &mut SetterRegistryBuilder) {
    b.register(C::RocketComponent, "name", StringSetter::new(|c| Some(&mut c.name)))
        .register(C::RocketComponent, "comment", StringSetter::new(|c| Some(&mut c.comment)))
        .register(C::RocketComponent, "color", ColorSetter)
        .register(
            C::RocketComponent,
            "linestyle",
            OptionalEnumSetter::<LineStyle>::new(|c| Some(&mut c.line_style)),
        )
        .register(C::RocketComponent, "position", PositionSetter::new(Axis::Axial))
        .register(C::RocketComponent, "axialoffset", PositionSetter::new(Axis::Axial))
        .register(C::RocketComponent, "radiusoffset", PositionSetter::new(Axis::Radial))
        .register(
            C::RocketComponent,
            "angleoffset",
            PositionSetter::scaled(Axis::Angular, DEG),
        )
        .register(
            C::RocketComponent,
            "overridemass",
            OverrideSetter::new(|c| Some(&mut c.mass_override)),
        )
        .register(
            C::RocketComponent,
            "overridecg",
            OverrideSetter::new(|c| Some(&mut c.cg_override)),
        )
        .register(
            C::RocketComponent,
            "overridesubcomponents",
            BooleanSetter::new(|c| Some(&mut c.override_subcomponents)),
        )
        .register(C::RocketComponent, "preset", ComponentPresetSetter);
}

fn register_external(b: &mut SetterRegistryBuilder) {
    b.register(
        C::ExternalComponent,
        "finish",
        EnumSetter::<Finish>::new(|c| c.external_mut().map(|e| &mut e.finish)),
    )
    .register(
        C::ExternalComponent,
        "material",
        MaterialSetter::new(|c| c.external_mut().map(|e| &mut e.material), MaterialType::Bulk),
    );

    b.register(C::BodyComponent, "length", DoubleSetter::new(|c| c.body_length_mut()));
    b.register(
        C::SymmetricComponent,
        "thickness",
        DoubleSetter::new(|c| c.wall_thickness_mut()).with_special("filled", |c| c.filled_mut()),
    );

    b.register(
        C::BodyTube,
        "radius",
        DoubleSetter::new(|c| c.body_tube_mut().map(|t| &mut t.outer_radius))
            .with_special("auto", |c| c.body_tube_mut().map(|t| &mut t.outer_radius_automatic)),
    );

    // Transition and nose cone
    b.register(
        C::Transition,
        "shape",
        EnumSetter::<Shape>::new(|c| c.transition_mut().map(|t| &mut t.shape)),
    )
    .register(
        C::Transition,
        "shapeclipped",
        BooleanSetter::new(|c| c.transition_mut().map(|t| &mut t.clipped)),
    )
    .register(
        C::Transition,
        "shapeparameter",
        DoubleSetter::new(|c| c.transition_mut().map(|t| &mut t.shape_parameter)),
    )
    .register(
        C::Transition,
        "foreradius",
        DoubleSetter::new(|c| c.transition_mut().map(|t| &mut t.fore_radius))
            .with_special("auto", |c| c.transition_mut().map(|t| &mut t.fore_radius_automatic)),
    )
    .register(
        C::Transition,
        "aftradius",
        DoubleSetter::new(|c| c.transition_mut().map(|t| &mut t.aft_radius))
            .with_special("auto", |c| c.transition_mut().map(|t| &mut t.aft_radius_automatic)),
    )
    .register(
        C::Transition,
        "foreshoulderradius",
        DoubleSetter::new(|c| c.transition_mut().map(|t| &mut t.fore_shoulder.radius)),
    )
    .register(
        C::Transition,
        "foreshoulderlength",
        DoubleSetter::new(|c| c.transition_mut().map(|t| &mut t.fore_shoulder.length)),
    )
    .register(
        C::Transition,
        "foreshoulderthickness",
        DoubleSetter::new(|c| c.transition_mut().map(|t| &mut t.fore_shoulder.thickness)),
    )
    .register(
        C::Transition,
        "foreshouldercapped",
        BooleanSetter::new(|c| c.transition_mut().map(|t| &mut t.fore_shoulder.capped)),
    )
    .register(
        C::Transition,
        "aftshoulderradius",
        DoubleSetter::new(|c| c.transition_mut().map(|t| &mut t.aft_shoulder.radius)),
    )
    .register(
        C::Transition,
        "aftshoulderlength",
        DoubleSetter::new(|c| c.transition_mut().map(|t| &mut t.aft_shoulder.length)),
    )
    .register(
        C::Transition,
        "aftshoulderthickness",
        DoubleSetter::new(|c| c.transition_mut().map(|t| &mut t.aft_shoulder.thickness)),
    )
    .register(
        C::Transition,
        "aftshouldercapped",
        BooleanSetter::new(|c| c.transition_mut().map(|t| &mut t.aft_shoulder.capped)),
    );

    // A nose cone has no fore end.
    for element in [
        "foreradius",
        "foreshoulderradius",
        "foreshoulderlength",
        "foreshoulderthickness",
        "foreshouldercapped",
    ] {
        b.disable(C::NoseCone, element);
    }

    b.register(
        C::LaunchLug,
        "radius",
        DoubleSetter::new(|c| c.launch_lug_mut().map(|l| &mut l.outer_radius)),
    )
    .register(
        C::LaunchLug,
        "length",
        DoubleSetter::new(|c| c.launch_lug_mut().map(|l| &mut l.length)),
    )
    .register(
        C::LaunchLug,
        "thickness",
        DoubleSetter::new(|c| c.launch_lug_mut().map(|l| &mut l.thickness)),
    )
    .register(
        C::LaunchLug,
        "radialdirection",
        DoubleSetter::scaled(|c| Some(&mut c.position.angle_offset), DEG),
    );
}

fn register_fins(b: &mut SetterRegistryBuilder) {
    b.register(
        C::FinSet,
        "fincount",
        IntSetter::new(|c| c.fin_set_mut().map(|f| &mut f.fin_count)),
    )
    .register(
        C::FinSet,
        "rotation",
        DoubleSetter::scaled(|c| c.fin_set_mut().map(|f| &mut f.base_rotation), DEG),
    )
    .register(
        C::FinSet,
        "thickness",
        DoubleSetter::new(|c| c.fin_set_mut().map(|f| &mut f.thickness)),
    )
    .register(
        C::FinSet,
        "crosssection",
        EnumSetter::<CrossSection>::new(|c| c.fin_set_mut().map(|f| &mut f.cross_section)),
    )
    .register(
        C::FinSet,
        "cant",
        DoubleSetter::scaled(|c| c.fin_set_mut().map(|f| &mut f.cant_angle), DEG),
    )
    .register(
        C::FinSet,
        "tabheight",
        DoubleSetter::new(|c| c.fin_set_mut().map(|f| &mut f.tab_height)),
    )
    .register(
        C::FinSet,
        "tablength",
        DoubleSetter::new(|c| c.fin_set_mut().map(|f| &mut f.tab_length)),
    )
    .register(C::FinSet, "tabposition", FinTabPositionSetter)
    .register(
        C::FinSet,
        "filletradius",
        DoubleSetter::new(|c| c.fin_set_mut().map(|f| &mut f.fillet_radius)),
    )
    .register(
        C::FinSet,
        "filletmaterial",
        MaterialSetter::new(
            |c| c.fin_set_mut().map(|f| &mut f.fillet_material),
            MaterialType::Bulk,
        ),
    );

    b.register(
        C::TrapezoidFinSet,
        "rootchord",
        DoubleSetter::new(|c| c.fin_set_mut().map(|f| &mut f.root_chord)),
    )
    .register(
        C::TrapezoidFinSet,
        "tipchord",
        DoubleSetter::new(|c| c.fin_set_mut().map(|f| &mut f.tip_chord)),
    )
    .register(
        C::TrapezoidFinSet,
        "sweeplength",
        DoubleSetter::new(|c| c.fin_set_mut().map(|f| &mut f.sweep)),
    )
    .register(
        C::TrapezoidFinSet,
        "height",
        DoubleSetter::new(|c| c.fin_set_mut().map(|f| &mut f.height)),
    );

    b.register(
        C::EllipticalFinSet,
        "rootchord",
        DoubleSetter::new(|c| c.fin_set_mut().map(|f| &mut f.root_chord)),
    )
    .register(
        C::EllipticalFinSet,
        "height",
        DoubleSetter::new(|c| c.fin_set_mut().map(|f| &mut f.height)),
    );

    b.register(
        C::TubeFinSet,
        "fincount",
        IntSetter::new(|c| c.tube_fin_set_mut().map(|f| &mut f.fin_count)),
    )
    .register(
        C::TubeFinSet,
        "rotation",
        DoubleSetter::scaled(|c| c.tube_fin_set_mut().map(|f| &mut f.base_rotation), DEG),
    )
    .register(
        C::TubeFinSet,
        "thickness",
        DoubleSetter::new(|c| c.tube_fin_set_mut().map(|f| &mut f.thickness)),
    )
    .register(
        C::TubeFinSet,
        "length",
        DoubleSetter::new(|c| c.tube_fin_set_mut().map(|f| &mut f.length)),
    )
    .register(
        C::TubeFinSet,
        "radius",
        DoubleSetter::new(|c| c.tube_fin_set_mut().map(|f| &mut f.outer_radius)).with_special(
            "auto",
            |c| c.tube_fin_set_mut().map(|f| &mut f.outer_radius_automatic),
        ),
    );
}

fn register_internal(b: &mut SetterRegistryBuilder) {
    b.register(
        C::StructuralComponent,
        "material",
        MaterialSetter::new(|c| c.ring_mut().map(|r| &mut r.material), MaterialType::Bulk),
    );

    b.register(
        C::RingComponent,
        "length",
        DoubleSetter::new(|c| c.ring_mut().map(|r| &mut r.length)),
    )
    .register(
        C::RingComponent,
        "radialposition",
        DoubleSetter::new(|c| Some(&mut c.position.radius_offset)),
    )
    .register(
        C::RingComponent,
        "radialdirection",
        DoubleSetter::scaled(|c| Some(&mut c.position.angle_offset), DEG),
    );

    b.register(
        C::ThicknessRingComponent,
        "thickness",
        DoubleSetter::new(|c| c.ring_mut().map(|r| &mut r.thickness)),
    )
    .register(
        C::ThicknessRingComponent,
        "outerradius",
        DoubleSetter::new(|c| c.ring_mut().map(|r| &mut r.outer_radius))
            .with_special("auto", |c| c.ring_mut().map(|r| &mut r.outer_radius_automatic)),
    );

    b.register(
        C::RadiusRingComponent,
        "outerradius",
        DoubleSetter::new(|c| c.ring_mut().map(|r| &mut r.outer_radius))
            .with_special("auto", |c| c.ring_mut().map(|r| &mut r.outer_radius_automatic)),
    )
    .register(
        C::RadiusRingComponent,
        "innerradius",
        DoubleSetter::new(|c| c.ring_mut().map(|r| &mut r.inner_radius))
            .with_special("auto", |c| c.ring_mut().map(|r| &mut r.inner_radius_automatic)),
    );

    b.register(
        C::InnerTube,
        "clusterconfiguration",
        ClusterConfigurationSetter,
    )
    .register(
        C::InnerTube,
        "clusterscale",
        DoubleSetter::new(|c| c.inner_tube_mut().map(|t| &mut t.cluster_scale)),
    )
    .register(
        C::InnerTube,
        "clusterrotation",
        DoubleSetter::scaled(|c| c.inner_tube_mut().map(|t| &mut t.cluster_rotation), DEG),
    );

    // Mass objects
    b.register(
        C::MassObject,
        "packedlength",
        DoubleSetter::new(|c| c.mass_object_mut().map(|m| &mut m.packed_length)),
    )
    .register(
        C::MassObject,
        "packedradius",
        DoubleSetter::new(|c| c.mass_object_mut().map(|m| &mut m.packed_radius)),
    )
    .register(
        C::MassObject,
        "radialposition",
        DoubleSetter::new(|c| Some(&mut c.position.radius_offset)),
    )
    .register(
        C::MassObject,
        "radialdirection",
        DoubleSetter::scaled(|c| Some(&mut c.position.angle_offset), DEG),
    );

    b.register(
        C::MassComponent,
        "mass",
        DoubleSetter::new(|c| c.mass_component_mut().map(|m| &mut m.mass)),
    )
    .register(
        C::MassComponent,
        "masscomponenttype",
        EnumSetter::<MassComponentType>::new(|c| {
            c.mass_component_mut().map(|m| &mut m.mass_component_type)
        }),
    );

    b.register(
        C::ShockCord,
        "cordlength",
        DoubleSetter::new(|c| c.shock_cord_mut().map(|s| &mut s.cord_length)),
    )
    .register(
        C::ShockCord,
        "material",
        MaterialSetter::new(|c| c.shock_cord_mut().map(|s| &mut s.material), MaterialType::Line),
    );

    b.register(
        C::RecoveryDevice,
        "cd",
        DoubleSetter::new(|c| c.recovery_device_mut().map(|r| &mut r.cd))
            .with_special("auto", |c| c.recovery_device_mut().map(|r| &mut r.cd_automatic)),
    )
    .register(
        C::RecoveryDevice,
        "deployevent",
        EnumSetter::<DeployEvent>::new(|c| c.recovery_device_mut().map(|r| &mut r.deploy_event)),
    )
    .register(
        C::RecoveryDevice,
        "deployaltitude",
        DoubleSetter::new(|c| c.recovery_device_mut().map(|r| &mut r.deploy_altitude)),
    )
    .register(
        C::RecoveryDevice,
        "deploydelay",
        DoubleSetter::new(|c| c.recovery_device_mut().map(|r| &mut r.deploy_delay)),
    )
    .register(
        C::RecoveryDevice,
        "material",
        MaterialSetter::new(
            |c| c.recovery_device_mut().map(|r| &mut r.material),
            MaterialType::Surface,
        ),
    );

    b.register(
        C::Parachute,
        "diameter",
        DoubleSetter::new(|c| c.parachute_mut().map(|p| &mut p.diameter)),
    )
    .register(
        C::Parachute,
        "linecount",
        IntSetter::new(|c| c.parachute_mut().map(|p| &mut p.line_count)),
    )
    .register(
        C::Parachute,
        "linelength",
        DoubleSetter::new(|c| c.parachute_mut().map(|p| &mut p.line_length)),
    )
    .register(
        C::Parachute,
        "linematerial",
        MaterialSetter::new(
            |c| c.parachute_mut().map(|p| &mut p.line_material),
            MaterialType::Line,
        ),
    );

    b.register(
        C::Streamer,
        "striplength",
        DoubleSetter::new(|c| c.streamer_mut().map(|s| &mut s.strip_length)),
    )
    .register(
        C::Streamer,
        "stripwidth",
        DoubleSetter::new(|c| c.streamer_mut().map(|s| &mut s.strip_width)),
    );
}

fn register_assemblies(b: &mut SetterRegistryBuilder) {
    b.register(
        C::Rocket,
        "referencetype",
        EnumSetter::<ReferenceType>::new(|c| c.rocket_mut().map(|r| &mut r.reference_type)),
    )
    .register(
        C::Rocket,
        "customreference",
        DoubleSetter::new(|c| c.rocket_mut().map(|r| &mut r.custom_reference_length)),
    )
    .register(
        C::Rocket,
        "designer",
        StringSetter::new(|c| c.rocket_mut().map(|r| &mut r.designer)),
    )
    .register(
        C::Rocket,
        "revision",
        StringSetter::new(|c| c.rocket_mut().map(|r| &mut r.revision)),
    );

    b.register(
        C::Stage,
        "separationevent",
        EnumSetter::<SeparationEvent>::new(|c| c.stage_mut().map(|s| &mut s.separation_event)),
    )
    .register(
        C::Stage,
        "separationdelay",
        DoubleSetter::new(|c| c.stage_mut().map(|s| &mut s.separation_delay)),
    );
}

#[cfg(test)]
mod tests {
    use crate::context::LoadingContext;
    use crate::native::{Resolution, SetterRegistry};
    use crate::objects::{ComponentType, RocketComponent};
    use crate::reader::Attributes;
    use crate::warning::WarningSet;

    fn apply(c: &mut RocketComponent, element: &str, value: &str) -> WarningSet {
        let ctx = LoadingContext::new();
        let mut warnings = WarningSet::new();
        match SetterRegistry::shared().resolve(c.component_type(), element) {
            Resolution::Found(s) => s.set(c, value, &Attributes::new(), &ctx, &mut warnings),
            _ => panic!("{} not registered for {}", element, c.component_type()),
        }
        warnings
    }

    #[test]
    fn test_radial_direction_in_degrees() {
        let mut lug = RocketComponent::new(ComponentType::LaunchLug);
        apply(&mut lug, "radialdirection", "180");
        assert!((lug.position.angle_offset - std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn test_thickness_filled() {
        let mut nose = RocketComponent::new(ComponentType::NoseCone);
        apply(&mut nose, "thickness", "filled");
        assert!(nose.transition().unwrap().filled);
        apply(&mut nose, "thickness", "0.001");
        assert!(!nose.transition().unwrap().filled);
        assert_eq!(nose.transition().unwrap().thickness, 0.001);
    }

    #[test]
    fn test_ring_radii() {
        let mut ring = RocketComponent::new(ComponentType::CenteringRing);
        apply(&mut ring, "innerradius", "0.01");
        apply(&mut ring, "outerradius", "auto");
        let r = ring.ring().unwrap();
        assert_eq!(r.inner_radius, 0.01);
        assert!(!r.inner_radius_automatic);
        assert!(r.outer_radius_automatic);
    }

    #[test]
    fn test_parachute_materials() {
        let mut chute = RocketComponent::new(ComponentType::Parachute);
        let ctx = LoadingContext::new();
        let mut warnings = WarningSet::new();
        let attrs: Attributes = vec![("density", "0.0003")].into_iter().collect();
        if let Resolution::Found(s) =
            SetterRegistry::shared().resolve(ComponentType::Parachute, "linematerial")
        {
            s.set(&mut chute, "Kevlar thread", &attrs, &ctx, &mut warnings);
        }
        let attrs: Attributes = vec![("density", "0.021")].into_iter().collect();
        if let Resolution::Found(s) = SetterRegistry::shared().resolve(ComponentType::Parachute, "material") {
            s.set(&mut chute, "Mylar", &attrs, &ctx, &mut warnings);
        }
        assert!(warnings.is_empty());
        assert_eq!(chute.material().unwrap().name, "Mylar");
        assert_eq!(chute.parachute_mut().unwrap().line_material.name, "Kevlar thread");
    }
}
