use std::rc::Rc ;
use lazy_link::{ ComponentOptions, DynamicComponents, FactoryRegistry, Injector, MountNode, RootViews, ViewContainerRef };
use crate::logs::CapturedLogs ;
use crate::fixtures::{ harness, widget_factory, Probe, WIDGET };

#[test]
fn without_container_mounts_under_the_root() {

	let logs = CapturedLogs::default();
	let _guard = logs.install();

	let probe = Probe::new();
	let harness = harness( FactoryRegistry::new().with( widget_factory( &probe )));

	let handle = harness.engine.create_and_attach_component( &WIDGET.into(), ComponentOptions::new() ).unwrap();
	let view = handle.component_ref().host_view();

	assert!( harness.views.contains( view.id() ));
	assert_eq!( harness.body.children(), vec![ view.root_node() ]);
	assert!( logs.contains( "No view container was provided" ));

	handle.detach();

	assert!( !harness.views.contains( view.id() ));
	assert!( harness.body.children().is_empty() );
	assert_eq!( probe.destroyed.get(), 1 );

}

#[test]
fn with_container_leaves_the_root_alone() {

	let logs = CapturedLogs::default();
	let _guard = logs.install();

	let probe = Probe::new();
	let harness = harness( FactoryRegistry::new().with( widget_factory( &probe )));
	let container = ViewContainerRef::new();

	let handle = harness.engine.create_and_attach_component(
		&WIDGET.into(),
		ComponentOptions::new().with_container( &container ),
	).unwrap();

	assert!( harness.views.views().is_empty() );
	assert!( harness.body.children().is_empty() );
	assert!( container.get( 0 ).is_some_and(| child | child.ptr_eq( handle.component_ref() )));
	assert!( !logs.contains( "No view container was provided" ));

}

#[test]
fn components_mount_on_the_configured_node() {

	let probe = Probe::new();
	let overlay = Rc::new( MountNode::new( "overlay" ));
	let engine = DynamicComponents::new(
		Rc::new( FactoryRegistry::new().with( widget_factory( &probe ))),
		Rc::new( RootViews::new() ),
		Injector::root(),
	).with_mount_point( Rc::clone( &overlay ) as _ );

	let first = engine.create_and_attach_component( &WIDGET.into(), ComponentOptions::new() ).unwrap();
	let second = engine.create_and_attach_component( &WIDGET.into(), ComponentOptions::new() ).unwrap();
	assert_eq!( overlay.name(), "overlay" );
	assert_eq!( overlay.children(), vec![
		first.component_ref().host_view().root_node(),
		second.component_ref().host_view().root_node(),
	]);

	first.detach();
	assert_eq!( overlay.children(), vec![ second.component_ref().host_view().root_node() ]);

}
